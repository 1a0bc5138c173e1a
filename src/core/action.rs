//! # Actions
//!
//! Everything that can happen in QueryDesk becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend responds? That's `Action::QueryResolved { id, outcome }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the caller must perform.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and effects.
//! And debuggable: log every action, replay the exact session.

use log::{debug, info, warn};

use crate::api::ServiceError;
use crate::core::staging::{self, FileHandle, SlotId};
use crate::core::state::{App, BackendStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Submit the draft as a new query.
    Submit(String),
    /// The backend call for exchange `id` finished.
    QueryResolved {
        id: usize,
        outcome: Result<String, ServiceError>,
    },
    /// Startup health probe finished.
    HealthChecked(Result<String, ServiceError>),
    /// Show the upload panel, or hide it (hiding clears staged files).
    ToggleUploadPanel,
    AddPickerSlot,
    /// A picker slot finished. `None` means the user cancelled.
    FileChosen {
        slot: SlotId,
        file: Option<FileHandle>,
    },
    /// The picked path could not be read.
    FilePickFailed { slot: SlotId, reason: String },
    RemoveStaged(SlotId),
    UploadFiles,
    OrganizeFiles,
    /// A file action finished.
    FileActionDone(Result<(), ServiceError>),
    Quit,
}

/// Backend actions on staged files.
#[derive(Debug, Clone, PartialEq)]
pub enum FileAction {
    Upload(Vec<FileHandle>),
    Organize,
}

/// I/O the event loop must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Call the query service for exchange `id`.
    SpawnQuery { id: usize, query: String },
    RunFileAction(FileAction),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Submit(text) => {
            // One request in flight at a time.
            if let Some(pending) = app.log.pending() {
                info!("Submit rejected: exchange {} still pending", pending.id);
                app.status_message = String::from("Still waiting for the previous response");
                return Effect::None;
            }
            let id = app.log.append_pending(text.clone());
            app.status_message = String::from("Generating...");
            Effect::SpawnQuery { id, query: text }
        }
        Action::QueryResolved { id, outcome } => {
            let answer = match outcome {
                Ok(text) => {
                    app.status_message.clear();
                    Some(text)
                }
                Err(e) => {
                    warn!("Query for exchange {} failed: {}", id, e);
                    app.status_message = String::from("Query failed");
                    None
                }
            };
            if let Err(e) = app.log.resolve(id, answer) {
                debug!("Dropped resolution: {:?}", e);
            }
            Effect::None
        }
        Action::HealthChecked(result) => {
            app.backend = match result {
                Ok(message) => {
                    info!("Backend at {} is up: {}", app.base_url, message);
                    BackendStatus::Online
                }
                Err(e) => {
                    warn!("Backend at {} unreachable: {}", app.base_url, e);
                    BackendStatus::Offline
                }
            };
            Effect::None
        }
        Action::ToggleUploadPanel => {
            app.upload_panel_open = !app.upload_panel_open;
            if !app.upload_panel_open {
                app.staging.reset();
            }
            Effect::None
        }
        Action::AddPickerSlot => {
            app.staging.add_picker_slot();
            Effect::None
        }
        Action::FileChosen { slot, file } => {
            if let Some(ref f) = file
                && !staging::is_accepted(&f.path, &app.accepted_extensions)
            {
                app.status_message = format!(
                    "{} is not an accepted file type ({})",
                    f.name,
                    accepted_list(&app.accepted_extensions)
                );
                return Effect::None;
            }
            if let Some(ref f) = file {
                app.status_message = format!("Staged {}", f.name);
            }
            app.staging.on_file_chosen(slot, file);
            Effect::None
        }
        Action::FilePickFailed { slot, reason } => {
            warn!("Picker slot {}: {}", slot, reason);
            app.status_message = reason;
            Effect::None
        }
        Action::RemoveStaged(id) => {
            app.staging.remove(id);
            Effect::None
        }
        Action::UploadFiles => {
            let files: Vec<FileHandle> = app.staging.staged().map(|s| s.file.clone()).collect();
            if files.is_empty() {
                app.status_message = String::from("No files staged");
                return Effect::None;
            }
            Effect::RunFileAction(FileAction::Upload(files))
        }
        Action::OrganizeFiles => Effect::RunFileAction(FileAction::Organize),
        Action::FileActionDone(result) => {
            app.status_message = match result {
                Ok(()) => String::from("Done"),
                Err(e) => e.to_string(),
            };
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn accepted_list(extensions: &[String]) -> String {
    extensions
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::discussion::{ERROR_RESPONSE, Response};
    use crate::test_support::test_app;
    use std::path::PathBuf;

    fn handle(name: &str) -> FileHandle {
        FileHandle {
            path: PathBuf::from(name),
            name: name.to_string(),
            size: 1,
        }
    }

    #[test]
    fn submit_appends_pending_and_spawns_query() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("hello".into()));

        assert_eq!(
            effect,
            Effect::SpawnQuery {
                id: 0,
                query: "hello".into()
            }
        );
        let exchanges = app.log.exchanges();
        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].id, 0);
        assert_eq!(exchanges[0].query, "hello");
        assert_eq!(exchanges[0].response.text(), "generating...");
    }

    #[test]
    fn hello_scenario_resolves_in_place() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        update(
            &mut app,
            Action::QueryResolved {
                id: 0,
                outcome: Ok("hi there".into()),
            },
        );

        let exchanges = app.log.exchanges();
        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].id, 0);
        assert_eq!(exchanges[0].query, "hello");
        assert_eq!(exchanges[0].response, Response::Answered("hi there".into()));
    }

    #[test]
    fn every_failure_cause_yields_the_same_sentinel() {
        let causes = [
            ServiceError::Network("connection refused".into()),
            ServiceError::Status {
                status: 500,
                body: "boom".into(),
            },
            ServiceError::Parse("expected value".into()),
        ];
        for cause in causes {
            let mut app = test_app();
            update(&mut app, Action::Submit("q".into()));
            update(
                &mut app,
                Action::QueryResolved {
                    id: 0,
                    outcome: Err(cause),
                },
            );
            assert_eq!(app.log.exchanges()[0].response.text(), ERROR_RESPONSE);
            assert!(!app.is_loading());
        }
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".into()));
        let effect = update(&mut app, Action::Submit("second".into()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.log.len(), 1);
        assert!(app.status_message.contains("Still waiting"));
    }

    #[test]
    fn submit_after_resolution_gets_next_id() {
        let mut app = test_app();
        update(&mut app, Action::Submit("a".into()));
        update(
            &mut app,
            Action::QueryResolved {
                id: 0,
                outcome: Ok("1".into()),
            },
        );
        let effect = update(&mut app, Action::Submit("b".into()));
        assert_eq!(
            effect,
            Effect::SpawnQuery {
                id: 1,
                query: "b".into()
            }
        );
    }

    #[test]
    fn empty_submission_still_creates_exchange() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit(String::new()));
        assert!(matches!(effect, Effect::SpawnQuery { id: 0, .. }));
        assert_eq!(app.log.exchanges()[0].query, "");
    }

    #[test]
    fn late_resolution_for_unknown_id_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q".into()));
        let revision = app.log.revision();
        update(
            &mut app,
            Action::QueryResolved {
                id: 42,
                outcome: Ok("x".into()),
            },
        );
        assert_eq!(app.log.revision(), revision);
        assert!(app.is_loading());
    }

    #[test]
    fn health_check_sets_backend_status() {
        let mut app = test_app();
        update(&mut app, Action::HealthChecked(Ok("API is running".into())));
        assert_eq!(app.backend, BackendStatus::Online);
        update(
            &mut app,
            Action::HealthChecked(Err(ServiceError::Network("refused".into()))),
        );
        assert_eq!(app.backend, BackendStatus::Offline);
    }

    #[test]
    fn closing_upload_panel_resets_staging() {
        let mut app = test_app();
        update(&mut app, Action::ToggleUploadPanel);
        assert!(app.upload_panel_open);

        update(&mut app, Action::AddPickerSlot);
        let slot = app.staging.open_slots()[0];
        update(
            &mut app,
            Action::FileChosen {
                slot,
                file: Some(handle("report.pdf")),
            },
        );
        assert_eq!(app.staging.len(), 1);

        update(&mut app, Action::ToggleUploadPanel);
        assert!(!app.upload_panel_open);
        assert!(app.staging.is_empty());
        assert!(app.staging.open_slots().is_empty());
    }

    #[test]
    fn rejected_extension_leaves_staging_unchanged() {
        let mut app = test_app();
        update(&mut app, Action::AddPickerSlot);
        let slot = app.staging.open_slots()[0];
        update(
            &mut app,
            Action::FileChosen {
                slot,
                file: Some(handle("photo.png")),
            },
        );
        assert!(app.staging.is_empty());
        assert_eq!(app.staging.open_slots(), &[slot]);
        assert!(app.status_message.contains(".pdf, .doc, .docx"));
    }

    #[test]
    fn cancelled_pick_is_noop() {
        let mut app = test_app();
        update(&mut app, Action::AddPickerSlot);
        let slot = app.staging.open_slots()[0];
        let status = app.status_message.clone();
        update(&mut app, Action::FileChosen { slot, file: None });
        assert!(app.staging.is_empty());
        assert_eq!(app.status_message, status);
    }

    #[test]
    fn upload_with_nothing_staged_does_not_run() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::UploadFiles), Effect::None);
        assert_eq!(app.status_message, "No files staged");
    }

    #[test]
    fn upload_collects_staged_files_and_keeps_them() {
        let mut app = test_app();
        update(&mut app, Action::AddPickerSlot);
        let slot = app.staging.open_slots()[0];
        update(
            &mut app,
            Action::FileChosen {
                slot,
                file: Some(handle("a.docx")),
            },
        );

        let effect = update(&mut app, Action::UploadFiles);
        assert_eq!(
            effect,
            Effect::RunFileAction(FileAction::Upload(vec![handle("a.docx")]))
        );

        update(
            &mut app,
            Action::FileActionDone(Err(ServiceError::NotImplemented("Upload Files"))),
        );
        assert_eq!(app.status_message, "Upload Files is not implemented yet");
        assert_eq!(app.staging.len(), 1);
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
