//! Application root: owns the store, the query executor and the navigator,
//! and applies the commands screens return.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use log::{debug, info, warn};

use crate::config::Config;
use crate::model::Angel;
use crate::nav::{NavigationError, Navigator};
use crate::query::{DeliveryQueue, QueryExecutor};
use crate::store::{MemoryStore, RecordStore};
use crate::tui::command::{Command, ScreenId, ScreenMsg};
use crate::tui::screen::{Screen, Services};
use crate::tui::screens::{self, ANGEL_INFO, HOLD, STATUS_SELECT};

pub struct AngelTracker {
    store: Arc<dyn RecordStore>,
    executor: QueryExecutor<ScreenMsg>,
    deliveries: DeliveryQueue<ScreenMsg>,
    navigator: Navigator<ScreenId, dyn Screen>,
    notice: Option<String>,
    should_quit: bool,
}

impl AngelTracker {
    /// Open the configured store and start on the main menu.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn startup(config: &Config) -> Result<Self> {
        let options = config.store_options()?;
        let store = MemoryStore::open(options)
            .await
            .context("Failed to open angel store")?;
        Self::with_store(config, Arc::new(store))
    }

    /// Start on the main menu against an already opened store.
    pub fn with_store(config: &Config, store: Arc<dyn RecordStore>) -> Result<Self> {
        let (executor, deliveries) = QueryExecutor::new(config.executor_config());
        let services = Services {
            store: store.clone(),
            executor: executor.clone(),
            search_debounce: config.search_debounce(),
        };

        let registry =
            screens::register_screens(&services).context("Failed to register screens")?;
        let navigator = Navigator::start(registry, ScreenId::MainMenu)
            .context("Failed to start navigation")?;

        info!("Angel tracker started");
        Ok(Self {
            store,
            executor,
            deliveries,
            navigator,
            notice: None,
            should_quit: false,
        })
    }

    /// Cancel every in-flight lookup and close the store.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.executor.shutdown();
        self.store.close().await.context("Failed to close angel store")?;
        info!("Angel tracker shut down");
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn executor(&self) -> &QueryExecutor<ScreenMsg> {
        &self.executor
    }

    pub fn navigator(&self) -> &Navigator<ScreenId, dyn Screen> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator<ScreenId, dyn Screen> {
        &mut self.navigator
    }

    /// Screen the user is looking at.
    pub fn active_screen(&mut self) -> Result<&mut (dyn Screen + 'static), NavigationError> {
        self.navigator.active_controller()
    }

    pub fn current_screen(&self) -> ScreenId {
        self.navigator.current()
    }

    /// Last navigation problem, shown in the footer until the next key.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route a key to the active screen and apply what it asks for.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.notice = None;
        let command = match self.active_screen() {
            Ok(screen) => screen.handle_key(key),
            Err(err) => {
                warn!("No active screen for key {:?}: {}", key.code, err);
                return;
            }
        };
        self.apply(command);
    }

    /// Hand every result that is ready to the screen that asked for it.
    /// Returns the number of results delivered.
    pub fn poll_deliveries(&mut self) -> usize {
        let messages = self.deliveries.drain();
        let count = messages.len();
        for message in messages {
            self.dispatch(message);
        }
        count
    }

    /// Wait for the next result and deliver it. Returns false once the
    /// executor can no longer produce results.
    pub async fn next_delivery(&mut self) -> bool {
        match self.deliveries.next().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, message: ScreenMsg) {
        let ScreenMsg { screen, delivery } = message;
        if screen != self.navigator.current() {
            debug!("Dropping result for {:?}, it is no longer on screen", screen);
            return;
        }
        let command = match self.active_screen() {
            Ok(screen) => screen.handle_delivery(delivery),
            Err(err) => {
                warn!("Dropping result for {:?}: {}", screen, err);
                return;
            }
        };
        self.apply(command);
    }

    pub fn apply(&mut self, command: Command) {
        if let Err(err) = self.execute(command) {
            warn!("Navigation failed: {}", err);
            self.notice = Some(err.to_string());
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), NavigationError> {
        match command {
            Command::None => Ok(()),
            // Stops at the first failed transition.
            Command::Batch(commands) => {
                for command in commands {
                    if self.should_quit {
                        break;
                    }
                    self.execute(command)?;
                }
                Ok(())
            }
            Command::Quit => {
                info!("Quit requested");
                self.should_quit = true;
                Ok(())
            }
            Command::Navigate(target) => self.navigator.navigate(target).map(drop),
            Command::NavigatePreserving(target) => {
                self.navigator.navigate_preserving(target).map(drop)
            }
            Command::Back => self.navigator.back().map(drop),
            Command::OpenAngel {
                target,
                angel,
                preserve,
            } => self.open_angel(target, angel, preserve),
        }
    }

    fn open_angel(
        &mut self,
        target: ScreenId,
        angel: Angel,
        preserve: bool,
    ) -> Result<(), NavigationError> {
        if preserve {
            self.navigator.navigate_preserving(target)?;
        } else {
            self.navigator.navigate(target)?;
        }

        // Entering resets the screen, so the hand-off comes after navigation.
        match target {
            ScreenId::StatusSelect => self.navigator.controller(STATUS_SELECT)?.set_angel(angel),
            ScreenId::AngelInfo => self.navigator.controller(ANGEL_INFO)?.show(angel),
            ScreenId::Hold => self.navigator.controller(HOLD)?.set_angel(angel),
            other => debug!("{:?} does not take an angel", other),
        }
        Ok(())
    }
}
