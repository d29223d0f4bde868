//! The five fixed dashboard charts and their dispatch.
//!
//! Each chart is described by a [`ChartDescriptor`] bound to a pre-existing container and is
//! executed independently: a missing container or a failing chart is logged and does not stop
//! the others. There is no aggregate completion signal.

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod gapi_renderer;
mod types;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use gapi_renderer::GapiChartRenderer;
pub use types::{
    BarOptions, ChartDescriptor, ChartOptions, ChartSpec, ChartType, DateRange, Query,
    END_YESTERDAY, START_30_DAYS_AGO,
};

use crate::error::EmbedResult;
use crate::logger::Logger;
use crate::management::ViewId;
use crate::presenter::{Container, ContainerLookup};

pub const CHART_CONTAINERS: [&str; 5] = [
    "chart-container-1",
    "chart-container-2",
    "chart-container-3",
    "chart-container-4",
    "chart-container-5",
];

static LOGGER: Logger = Logger::new("@ga-embed/charts");

/// Executes a chart into its container. Implementations start the chart's own data fetch and
/// return without waiting for it to render.
pub trait ChartRenderer {
    fn execute(&self, descriptor: &ChartDescriptor, container: &Container) -> EmbedResult<()>;
}

/// Builds the dashboard's charts for `view_id`, in container order.
pub fn dashboard_charts(view_id: &ViewId) -> [ChartDescriptor; 5] {
    let ids = view_id.query_id();
    let range = DateRange::trailing_30_days();
    let full_width = || Some("100%".to_string());

    [
        ChartDescriptor {
            query: Query::new(ids.clone(), "ga:sessions", "ga:date", &range),
            chart: ChartSpec {
                container: CHART_CONTAINERS[0],
                chart_type: ChartType::Line,
                options: ChartOptions {
                    title: Some("Traffic by Date".into()),
                    width: full_width(),
                    ..Default::default()
                },
            },
        },
        ChartDescriptor {
            query: Query::new(ids.clone(), "ga:uniquePageviews", "ga:pagePath", &range)
                .top(12, "-ga:uniquePageviews"),
            chart: ChartSpec {
                container: CHART_CONTAINERS[1],
                chart_type: ChartType::Pie,
                options: ChartOptions {
                    title: Some("Top Pages".into()),
                    width: full_width(),
                    height: full_width(),
                    is_3d: Some(true),
                    ..Default::default()
                },
            },
        },
        ChartDescriptor {
            query: Query::new(ids.clone(), "ga:users,ga:newUsers", "ga:date", &range),
            chart: ChartSpec {
                container: CHART_CONTAINERS[2],
                chart_type: ChartType::Column,
                options: ChartOptions {
                    title: Some("Users by Date".into()),
                    width: full_width(),
                    is_stacked: Some(true),
                    bar: Some(BarOptions {
                        group_width: "75%".into(),
                    }),
                    ..Default::default()
                },
            },
        },
        ChartDescriptor {
            query: Query::new(ids.clone(), "ga:users", "ga:country", &range),
            chart: ChartSpec {
                container: CHART_CONTAINERS[3],
                chart_type: ChartType::Geo,
                options: ChartOptions {
                    width: full_width(),
                    ..Default::default()
                },
            },
        },
        ChartDescriptor {
            query: Query::new(ids, "ga:users", "ga:source", &range).top(10, "-ga:users"),
            chart: ChartSpec {
                container: CHART_CONTAINERS[4],
                chart_type: ChartType::Table,
                options: ChartOptions {
                    width: full_width(),
                    height: full_width(),
                    ..Default::default()
                },
            },
        },
    ]
}

/// Issues every dashboard chart for `view_id` and returns the containers of the charts that
/// were handed to the renderer.
pub fn render_charts(
    renderer: &dyn ChartRenderer,
    lookup: &ContainerLookup,
    view_id: &ViewId,
) -> Vec<&'static str> {
    let mut issued = Vec::with_capacity(CHART_CONTAINERS.len());
    for descriptor in dashboard_charts(view_id) {
        let base_id = descriptor.chart.container;
        let Some(container) = lookup.resolve(base_id) else {
            LOGGER.warn(format!(
                "container `{}` not found; skipping {:?} chart",
                lookup.element_id(base_id),
                descriptor.chart.chart_type
            ));
            continue;
        };

        match renderer.execute(&descriptor, &container) {
            Ok(()) => issued.push(base_id),
            Err(err) => LOGGER.warn(format!("chart `{}` failed to start: {err}", container.element_id())),
        }
    }
    issued
}
