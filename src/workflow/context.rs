use crate::config::{self, WizardConfig};
use crate::draft::{DraftStore, FileSlot};
use crate::flow::{find_page, PageDef};
use crate::i18n::{Catalog, Locale};
use crate::nav::{HistoryNavigator, Navigator};
use crate::paths::StatePaths;
use crate::route::Route;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Everything a single command needs: persisted draft, navigation history,
/// config, and the catalog for the active locale.
pub(crate) struct SessionContext {
    pub(crate) paths: StatePaths,
    pub(crate) config: WizardConfig,
    pub(crate) store: DraftStore<FileSlot>,
    pub(crate) nav: HistoryNavigator<FileSlot>,
    pub(crate) catalog: Catalog,
}

impl SessionContext {
    pub(crate) fn load(state_dir: Option<&Path>, locale: Option<Locale>) -> Result<Self> {
        let paths = StatePaths::resolve(state_dir)?;
        let config = config::load_config(&paths)?;
        let store = DraftStore::open(paths.slot());
        let nav = HistoryNavigator::open(paths.slot(), config.locale);
        let catalog = Catalog::load(locale.unwrap_or_else(|| nav.locale()))?;
        tracing::debug!(
            state_dir = %paths.root().display(),
            route = %nav.current(),
            locale = %catalog.locale(),
            "session loaded"
        );
        Ok(Self {
            paths,
            config,
            store,
            nav,
            catalog,
        })
    }

    pub(crate) fn current(&self) -> &Route {
        self.nav.current()
    }

    /// Fail unless the session sits on `expected`.
    pub(crate) fn require_route(&self, expected: &Route, action: &str) -> Result<()> {
        if self.current() == expected {
            return Ok(());
        }
        Err(anyhow!(
            "{action} is only available on {expected} (current page is {})",
            self.current()
        ))
    }

    /// Step definition for the current route.
    pub(crate) fn require_page(&self, action: &str) -> Result<&'static PageDef> {
        find_page(self.current()).ok_or_else(|| {
            anyhow!(
                "{action} needs a flow page (current page is {})",
                self.current()
            )
        })
    }
}
