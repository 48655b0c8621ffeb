use std::future::Future;

use log::{debug, info};

use crate::handler::Interrupt;
use crate::nav::{NavEvent, NavigationEngine, ScreenModel, Transition};
use crate::remote::ListingProvider;
use crate::theme::ThemeColors;

/// Main application state.
pub struct App<P> {
    pub engine: NavigationEngine<P>,
    pub theme: ThemeColors,
    pub should_quit: bool,
    /// Set while a listing fetch is in flight.
    pub loading: bool,
}

impl<P: ListingProvider> App<P> {
    pub fn new(engine: NavigationEngine<P>, theme: ThemeColors) -> Self {
        Self {
            engine,
            theme,
            should_quit: false,
            loading: false,
        }
    }

    /// Snapshot to render, with the loading notice layered on top.
    pub fn screen(&self) -> ScreenModel {
        let mut screen = self.engine.snapshot();
        if self.loading {
            screen.status_message = Some("Loading… (Esc to cancel, q to quit)".into());
            screen.status_is_error = false;
        }
        screen
    }

    /// Run one navigation event to completion, or until `interrupt` fires.
    ///
    /// An interrupted fetch is dropped before anything is committed, so the
    /// navigation state stays as it was before the event.
    pub async fn dispatch<F>(&mut self, event: NavEvent, interrupt: F)
    where
        F: Future<Output = Interrupt>,
    {
        let outcome = tokio::select! {
            biased;
            result = self.engine.handle(event) => Ok(result),
            reason = interrupt => Err(reason),
        };

        match outcome {
            Ok(Ok(Transition::Quit)) => self.quit(),
            Ok(Ok(transition)) => debug!("{event:?} -> {transition:?}"),
            Ok(Err(e)) if e.is_silent() => {}
            Ok(Err(e)) => info!("{event:?} failed: {e}"),
            Err(Interrupt::Cancel) => {
                info!("{event:?} cancelled");
                self.engine.set_status("Cancelled");
            }
            Err(Interrupt::Quit) => {
                info!("{event:?} cancelled by quit");
                match self.engine.handle(NavEvent::Quit).await {
                    Ok(transition) => debug!("Quit -> {transition:?}"),
                    Err(e) => info!("Quit failed: {e}"),
                }
                self.quit();
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
