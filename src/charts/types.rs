use serde::Serialize;

pub const START_30_DAYS_AGO: &str = "30daysAgo";
pub const END_YESTERDAY: &str = "yesterday";

/// Chart kinds understood by `gapi.analytics.googleCharts.DataChart`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChartType {
    Line,
    Pie,
    Column,
    Geo,
    Table,
}

/// Relative reporting window using the Reporting API's date keywords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// The thirty days ending yesterday.
    pub fn trailing_30_days() -> Self {
        Self {
            start: START_30_DAYS_AGO.to_string(),
            end: END_YESTERDAY.to_string(),
        }
    }
}

/// Core Reporting API query run by a chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Query {
    pub ids: String,
    pub metrics: String,
    pub dimensions: String,
    #[serde(rename = "start-date")]
    pub start_date: String,
    #[serde(rename = "end-date")]
    pub end_date: String,
    #[serde(rename = "max-results", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Query {
    pub fn new(ids: impl Into<String>, metrics: &str, dimensions: &str, range: &DateRange) -> Self {
        Self {
            ids: ids.into(),
            metrics: metrics.to_string(),
            dimensions: dimensions.to_string(),
            start_date: range.start.clone(),
            end_date: range.end.clone(),
            max_results: None,
            sort: None,
        }
    }

    pub fn top(mut self, max_results: u32, sort: &str) -> Self {
        self.max_results = Some(max_results);
        self.sort = Some(sort.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BarOptions {
    #[serde(rename = "groupWidth")]
    pub group_width: String,
}

/// Google Charts display options. Unset options are left to the chart defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(rename = "is3D", skip_serializing_if = "Option::is_none")]
    pub is_3d: Option<bool>,
    #[serde(rename = "isStacked", skip_serializing_if = "Option::is_none")]
    pub is_stacked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<BarOptions>,
}

/// Rendering target of a chart. The container element itself is attached by the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    #[serde(skip)]
    pub container: &'static str,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub options: ChartOptions,
}

/// Query plus display configuration, serialized in the shape `DataChart` expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartDescriptor {
    pub query: Query,
    pub chart: ChartSpec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_embed_api_keys() {
        let descriptor = ChartDescriptor {
            query: Query::new("ga:1", "ga:users", "ga:source", &DateRange::trailing_30_days())
                .top(10, "-ga:users"),
            chart: ChartSpec {
                container: "chart-container-5",
                chart_type: ChartType::Table,
                options: ChartOptions {
                    width: Some("100%".into()),
                    ..Default::default()
                },
            },
        };

        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "query": {
                    "ids": "ga:1",
                    "metrics": "ga:users",
                    "dimensions": "ga:source",
                    "start-date": "30daysAgo",
                    "end-date": "yesterday",
                    "max-results": 10,
                    "sort": "-ga:users"
                },
                "chart": {
                    "type": "TABLE",
                    "options": { "width": "100%" }
                }
            })
        );
    }
}
