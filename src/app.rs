use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use eframe::egui;

use crate::config::DataPaths;
use crate::data::loader::{spawn_fetch, DataSource, FetchError};
use crate::data::model::EmigrantDataset;
use crate::state::{Action, AppState};
use crate::ui::panels::{self, UiRequest};
use crate::ui::plot;

type PendingFetch = Receiver<Result<EmigrantDataset, FetchError>>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EmigrantDashboardApp {
    pub state: AppState,
    paths: DataPaths,
    /// At most one fetch is in flight.
    pending: Option<PendingFetch>,
}

impl EmigrantDashboardApp {
    /// Create the app and kick off the startup fetch.
    pub fn new(cc: &eframe::CreationContext<'_>, paths: DataPaths) -> Self {
        let mut app = Self {
            state: AppState::default(),
            paths: paths.clone(),
            pending: None,
        };
        app.start_fetch(paths, &cc.egui_ctx);
        app
    }

    /// Start fetching from `paths`. The paths only become current once the
    /// fetch is accepted; while another fetch is in flight nothing changes.
    fn start_fetch(&mut self, paths: DataPaths, ctx: &egui::Context) -> bool {
        if self.pending.is_some() {
            log::warn!(
                "Fetch already in progress, ignoring request for {}",
                paths.dir.display()
            );
            return false;
        }
        log::info!(
            "Loading {} and {}",
            paths.records.display(),
            paths.yearly.display()
        );

        let source: Arc<dyn DataSource> = Arc::new(paths.source());
        let ctx = ctx.clone();
        self.pending = Some(spawn_fetch(source, move || ctx.request_repaint()));
        self.paths = paths;
        self.state.dispatch(Action::FetchStarted);
        true
    }

    /// Hand a finished fetch to the state owner.
    fn poll_fetch(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(FetchError::Interrupted),
        };
        self.pending = None;
        self.state.dispatch(Action::FetchFinished(result));
    }

    fn handle(&mut self, request: UiRequest, ctx: &egui::Context) {
        match request {
            UiRequest::OpenFolder(dir) => {
                self.start_fetch(DataPaths::in_dir(dir), ctx);
            }
            UiRequest::Reload => {
                self.start_fetch(self.paths.clone(), ctx);
            }
        }
    }
}

impl eframe::App for EmigrantDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        // ---- Top panel: menu bar ----
        let request = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;
        if let Some(request) = request {
            self.handle(request, ctx);
        }

        // ---- Left side panel: navigator + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_view(ui, &mut self.state);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_app(dir: &str) -> EmigrantDashboardApp {
        EmigrantDashboardApp {
            state: AppState::default(),
            paths: DataPaths::in_dir(dir),
            pending: None,
        }
    }

    /// Block until the in-flight fetch lands, then hand it to the state.
    fn finish_fetch(app: &mut EmigrantDashboardApp) {
        let rx = app.pending.take().unwrap();
        let result = rx.recv().unwrap();
        app.state.dispatch(Action::FetchFinished(result));
    }

    #[test]
    fn folder_picked_mid_fetch_does_not_replace_current_paths() {
        let ctx = egui::Context::default();
        let mut app = idle_app("first");
        assert!(app.start_fetch(DataPaths::in_dir("first"), &ctx));

        app.handle(UiRequest::OpenFolder("second".into()), &ctx);
        assert_eq!(app.paths.dir, std::path::PathBuf::from("first"));
        assert!(app.pending.is_some());
        assert!(app.state.loading);

        finish_fetch(&mut app);
        assert!(!app.state.loading);

        app.handle(UiRequest::OpenFolder("second".into()), &ctx);
        assert_eq!(app.paths.dir, std::path::PathBuf::from("second"));
        assert!(app.pending.is_some());
        finish_fetch(&mut app);
    }

    #[test]
    fn reload_reuses_current_paths() {
        let ctx = egui::Context::default();
        let mut app = idle_app("first");
        app.handle(UiRequest::Reload, &ctx);
        assert_eq!(app.paths.dir, std::path::PathBuf::from("first"));
        assert!(app.state.loading);
        finish_fetch(&mut app);
    }
}
