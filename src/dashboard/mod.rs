//! The linear dashboard pipeline: token fetch, authorize, resolve account and view, render.
//!
//! ```text
//! Unauthenticated -> TokenFetching -> Authenticated -> AccountsQueried -> ViewsQueried -> ChartsRendering
//!        \________________\__________________\________________\______________> Error
//! ```
//!
//! Any failure is terminal: the error panel is shown with the failure text and the pipeline
//! stops. There is no retry and no recovery transition.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::auth::Authorizer;
use crate::charts::{render_charts, ChartRenderer};
use crate::config::{DashboardSettings, EmbedConfig};
use crate::error::{EmbedError, EmbedResult};
use crate::logger::Logger;
use crate::management::{self, ManagementApi, ResolvedView};
use crate::presenter::Presenter;
use crate::token::TokenSource;

static LOGGER: Logger = Logger::new("@ga-embed/dashboard");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Unauthenticated,
    TokenFetching,
    Authenticated,
    AccountsQueried,
    ViewsQueried,
    ChartsRendering,
    Error,
}

/// What a successful run resolved and started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardOutcome {
    pub view: ResolvedView,
    pub property_name: Option<String>,
    /// Base ids of the chart containers whose charts were started.
    pub charts: Vec<&'static str>,
}

pub struct Dashboard {
    config: EmbedConfig,
    settings: DashboardSettings,
    presenter: Presenter,
    token_source: Rc<dyn TokenSource>,
    authorizer: Rc<dyn Authorizer>,
    management: Rc<dyn ManagementApi>,
    renderer: Rc<dyn ChartRenderer>,
    history: RefCell<Vec<Stage>>,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("settings", &self.settings)
            .field("stage", &self.stage())
            .finish()
    }
}

impl Dashboard {
    pub fn new(
        config: EmbedConfig,
        presenter: Presenter,
        token_source: Rc<dyn TokenSource>,
        authorizer: Rc<dyn Authorizer>,
        management: Rc<dyn ManagementApi>,
        renderer: Rc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            settings: DashboardSettings::default(),
            presenter,
            token_source,
            authorizer,
            management,
            renderer,
            history: RefCell::new(vec![Stage::Unauthenticated]),
        }
    }

    pub fn with_settings(mut self, settings: DashboardSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn stage(&self) -> Stage {
        self.history
            .borrow()
            .last()
            .copied()
            .unwrap_or(Stage::Unauthenticated)
    }

    /// Every stage entered so far, starting with [`Stage::Unauthenticated`].
    pub fn history(&self) -> Vec<Stage> {
        self.history.borrow().clone()
    }

    /// Runs the pipeline once. On failure the error panel shows the failure before the error is
    /// returned.
    pub async fn run(&self) -> EmbedResult<DashboardOutcome> {
        if self.stage() != Stage::Unauthenticated {
            return Err(EmbedError::Internal(format!(
                "dashboard already ran (stage {:?})",
                self.stage()
            )));
        }

        match self.run_stages().await {
            Ok(outcome) => {
                LOGGER.debug(format!(
                    "started {} chart(s) for view {}",
                    outcome.charts.len(),
                    outcome.view.view_id
                ));
                Ok(outcome)
            }
            Err(err) => {
                LOGGER.error(format!("{} ({})", err, err.code()));
                self.presenter.show_error(&err);
                self.enter(Stage::Error);
                Err(err)
            }
        }
    }

    async fn run_stages(&self) -> EmbedResult<DashboardOutcome> {
        self.authorizer.ready().await?;
        let config = self.config.validate()?;

        self.enter(Stage::TokenFetching);
        let token = self
            .token_source
            .fetch(&config.service_url)
            .await?
            .into_token()?;

        self.presenter.show_authenticated();
        self.authorizer.authorize(&token)?;
        self.enter(Stage::Authenticated);

        let api = self.management.as_ref();
        let view = management::resolve_view(api, &config.tracking_id, |_| {
            self.enter(Stage::AccountsQueried)
        })
        .await?;
        self.enter(Stage::ViewsQueried);

        let property_name = if self.settings.show_property_name {
            let name =
                management::property_name(api, &view.account_id, &view.web_property_id).await;
            if let Some(name) = &name {
                self.presenter.show_property_name(name);
            }
            name
        } else {
            None
        };

        self.enter(Stage::ChartsRendering);
        let charts = render_charts(self.renderer.as_ref(), self.presenter.lookup(), &view.view_id);

        Ok(DashboardOutcome {
            view,
            property_name,
            charts,
        })
    }

    fn enter(&self, stage: Stage) {
        LOGGER.debug(format!("entering {stage:?}"));
        self.history.borrow_mut().push(stage);
    }
}
