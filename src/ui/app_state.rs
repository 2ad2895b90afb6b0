use std::sync::mpsc::{self, Receiver, Sender};

use egui::Context;
use time::OffsetDateTime;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{ApiClient, Comment, Video, VideoUpdate};
use crate::forms::{EditForm, UploadForm};
use crate::identity::Identity;
use crate::listing::{VIDEOS_LOAD_FAILED, VideoListState};
use crate::notify::Notifications;
use crate::player::{COMMENTS_LOAD_FAILED, PlayerState};
use crate::prefs::{Prefs, PrefsStore};
use crate::shell::{Screen, Shell};

use super::thumbnails::ThumbnailCache;

/// Results sent back from runtime tasks, drained once per frame.
pub enum TaskEvent {
    VideosLoaded {
        generation: u64,
        result: Result<Vec<Video>, String>,
    },
    CommentsLoaded {
        generation: u64,
        result: Result<Vec<Comment>, String>,
    },
    VideoCreated(Result<(), String>),
    VideoUpdated {
        update: VideoUpdate,
        result: Result<(), String>,
    },
    CommentPosted {
        temp_id: String,
        result: Result<(), String>,
    },
}

#[derive(Default)]
pub struct SplashForm {
    pub first_name: String,
    pub last_name: String,
    pub error: Option<String>,
}

pub struct AppState {
    store: Option<PrefsStore>,
    pub prefs: Prefs,
    client: ApiClient,
    pub runtime: Runtime,
    ctx: Context,
    pub shell: Shell,
    pub list: VideoListState,
    pub player: PlayerState,
    pub upload: UploadForm,
    pub edit: Option<EditForm>,
    pub splash: SplashForm,
    pub notifications: Notifications,
    pub thumbnail_cache: ThumbnailCache,
    last_screen: Option<Screen>,
    list_task: Option<JoinHandle<()>>,
    comments_task: Option<JoinHandle<()>>,
    events_tx: Sender<TaskEvent>,
    events_rx: Receiver<TaskEvent>,
}

impl AppState {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        super::theme::apply_eduwatch_theme(&cc.egui_ctx);

        let store = match PrefsStore::default_location() {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(error = %err, "identity will not persist");
                None
            }
        };
        let prefs = store.as_ref().map(PrefsStore::load).unwrap_or_default();
        let client = ApiClient::new(prefs.api_base_url());
        info!(base_url = client.base_url(), "using API");

        let runtime = Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to start tokio runtime");
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            shell: Shell::new(prefs.identity()),
            store,
            prefs,
            client,
            runtime,
            ctx: cc.egui_ctx.clone(),
            list: VideoListState::default(),
            player: PlayerState::default(),
            upload: UploadForm::default(),
            edit: None,
            splash: SplashForm::default(),
            notifications: Notifications::default(),
            thumbnail_cache: ThumbnailCache::new(),
            last_screen: None,
            list_task: None,
            comments_task: None,
            events_tx,
            events_rx,
        }
    }

    /// Starts whatever fetch the current screen is missing. Entering the list
    /// always re-fetches, entering the player starts from a clean slate.
    pub fn sync_screen(&mut self) {
        let screen = self.shell.screen();
        if self.last_screen != Some(screen) {
            match screen {
                Screen::List => self.list.remount(),
                Screen::Player => self.player.reset(),
                Screen::Splash => {}
            }
            self.last_screen = Some(screen);
        }

        match screen {
            Screen::List if self.list.needs_load(self.shell.refresh_token()) => {
                self.launch_list_fetch();
            }
            Screen::Player => {
                let pending = self
                    .shell
                    .selected_video()
                    .filter(|video| self.player.needs_load(video))
                    .map(|video| video.id.clone());
                if let Some(video_id) = pending {
                    self.player.reset();
                    self.launch_comments_fetch(&video_id);
                }
            }
            _ => {}
        }
    }

    pub fn launch_list_fetch(&mut self) {
        if let Some(handle) = self.list_task.take() {
            handle.abort();
        }
        let Some(fetch) = self
            .list
            .begin_load(self.shell.identity(), self.shell.refresh_token())
        else {
            return;
        };

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        let task = self.runtime.spawn(async move {
            let result = client
                .list_user_videos(&fetch.user_id)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(TaskEvent::VideosLoaded {
                generation: fetch.generation,
                result,
            });
            ctx.request_repaint();
        });
        self.list_task = Some(task);
    }

    pub fn launch_comments_fetch(&mut self, video_id: &str) {
        if let Some(handle) = self.comments_task.take() {
            handle.abort();
        }
        let generation = self.player.thread.begin_load(video_id);

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        let video_id = video_id.to_owned();
        let task = self.runtime.spawn(async move {
            let result = client
                .list_comments(&video_id)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(TaskEvent::CommentsLoaded { generation, result });
            ctx.request_repaint();
        });
        self.comments_task = Some(task);
    }

    pub fn retry_comments(&mut self) {
        if let Some(video_id) = self.shell.selected_video().map(|video| video.id.clone()) {
            self.launch_comments_fetch(&video_id);
        }
    }

    pub fn sign_in(&mut self) {
        let identity = match Identity::from_name(&self.splash.first_name, &self.splash.last_name) {
            Ok(identity) => identity,
            Err(err) => {
                self.splash.error = Some(err.to_string());
                return;
            }
        };
        if let Some(store) = &self.store {
            match store.remember_identity(&identity) {
                Ok(prefs) => self.prefs = prefs,
                Err(err) => warn!(error = %err, "failed to persist identity"),
            }
        }
        if self.shell.sign_in(identity) {
            self.splash = SplashForm::default();
        }
    }

    pub fn logout(&mut self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.clear() {
                warn!(error = %err, "failed to clear prefs");
            }
        }
        for handle in [self.list_task.take(), self.comments_task.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
        self.prefs = Prefs {
            user_id: None,
            ..self.prefs.clone()
        };
        self.session().sign_out();
        self.splash = SplashForm::default();
        self.thumbnail_cache.clear();
        self.last_screen = None;
    }

    pub fn open_upload(&mut self) {
        self.upload = UploadForm::default();
        self.shell.open_upload();
    }

    pub fn close_upload(&mut self) {
        if !self.upload.state.submitting {
            self.shell.close_upload();
        }
    }

    pub fn submit_upload(&mut self) {
        let Some(owner) = self.shell.identity().cloned() else {
            return;
        };
        let payload = match self.upload.begin_submit(&owner) {
            Ok(payload) => payload,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let result = client
                .create_video(&payload)
                .await
                .map(|_| ())
                .map_err(|err| err.to_string());
            let _ = tx.send(TaskEvent::VideoCreated(result));
            ctx.request_repaint();
        });
    }

    pub fn open_edit(&mut self) {
        if self.shell.open_edit() {
            self.edit = self.shell.selected_video().map(EditForm::new);
        }
    }

    pub fn close_edit(&mut self) {
        if self.edit.as_ref().is_some_and(|form| form.state.submitting) {
            return;
        }
        self.shell.close_edit();
        self.edit = None;
    }

    pub fn submit_edit(&mut self) {
        let Some(form) = self.edit.as_mut() else {
            return;
        };
        let update = match form.begin_submit() {
            Ok(update) => update,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let result = client
                .update_video(&update)
                .await
                .map(|_| ())
                .map_err(|err| err.to_string());
            let _ = tx.send(TaskEvent::VideoUpdated { update, result });
            ctx.request_repaint();
        });
    }

    pub fn submit_comment(&mut self) {
        let Some(author) = self.shell.identity().cloned() else {
            return;
        };
        let pending = match self
            .player
            .thread
            .begin_submit(&author, OffsetDateTime::now_utc())
        {
            Ok(pending) => pending,
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let result = client
                .create_comment(&pending.request)
                .await
                .map(|_| ())
                .map_err(|err| err.to_string());
            let _ = tx.send(TaskEvent::CommentPosted {
                temp_id: pending.temp_id,
                result,
            });
            ctx.request_repaint();
        });
    }

    /// Hands the video to an external player at the chosen speed.
    pub fn open_video(&mut self, url: &str) {
        let speed = self.player.speed.multiplier();
        if let Err(err) = super::utils::open_video_url(url, speed) {
            warn!(url, speed, error = %err, "failed to open video");
            self.notifications.error(format!("Could not open video: {err}"));
        }
    }

    pub fn handle_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: TaskEvent) {
        match self.session().apply(event) {
            Settled::List => {
                self.list_task = None;
                self.thumbnail_cache
                    .sync(self.list.videos(), &self.ctx, &self.runtime);
            }
            Settled::Comments => self.comments_task = None,
            Settled::Nothing => {}
        }
    }

    fn session(&mut self) -> Session<'_> {
        Session {
            shell: &mut self.shell,
            list: &mut self.list,
            player: &mut self.player,
            upload: &mut self.upload,
            edit: &mut self.edit,
            notifications: &mut self.notifications,
        }
    }
}

/// Which fetch, if any, an applied event settled for the current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Settled {
    Nothing,
    List,
    Comments,
}

/// The in-memory state a finished task or a logout touches.
pub(crate) struct Session<'a> {
    pub shell: &'a mut Shell,
    pub list: &'a mut VideoListState,
    pub player: &'a mut PlayerState,
    pub upload: &'a mut UploadForm,
    pub edit: &'a mut Option<EditForm>,
    pub notifications: &'a mut Notifications,
}

impl Session<'_> {
    pub fn apply(&mut self, event: TaskEvent) -> Settled {
        match event {
            TaskEvent::VideosLoaded { generation, result } => {
                let failed = result.is_err();
                if let Err(err) = &result {
                    warn!(error = %err, generation, "video list fetch failed");
                }
                if !self.list.finish_load(generation, result) {
                    return Settled::Nothing;
                }
                if failed {
                    self.notifications.error(VIDEOS_LOAD_FAILED);
                }
                Settled::List
            }
            TaskEvent::CommentsLoaded { generation, result } => {
                let failed = result.is_err();
                if let Err(err) = &result {
                    warn!(error = %err, generation, "comment fetch failed");
                }
                if !self.player.thread.finish_load(generation, result) {
                    return Settled::Nothing;
                }
                if failed {
                    self.notifications.error(COMMENTS_LOAD_FAILED);
                }
                Settled::Comments
            }
            TaskEvent::VideoCreated(result) => {
                if !self.upload.state.submitting {
                    return Settled::Nothing;
                }
                let message = result.as_ref().err().cloned();
                if self.upload.finish_submit(result) {
                    self.notifications.success("Video uploaded successfully!");
                    *self.upload = UploadForm::default();
                    self.shell.video_uploaded();
                } else if let Some(message) = message {
                    self.notifications.error(message);
                }
                Settled::Nothing
            }
            TaskEvent::VideoUpdated { update, result } => {
                let Some(form) = self
                    .edit
                    .as_mut()
                    .filter(|form| form.original().id == update.video_id)
                else {
                    return Settled::Nothing;
                };
                let message = result.as_ref().err().cloned();
                match form.finish_submit(&update, result) {
                    Some(updated) => {
                        self.notifications.success("Video updated successfully!");
                        *self.edit = None;
                        self.shell.video_edited(updated);
                    }
                    None => {
                        if let Some(message) = message {
                            self.notifications.error(message);
                        }
                    }
                }
                Settled::Nothing
            }
            TaskEvent::CommentPosted { temp_id, result } => {
                let still_present = self
                    .player
                    .thread
                    .comments()
                    .iter()
                    .any(|comment| comment.id == temp_id);
                match result {
                    Ok(()) => {
                        if still_present {
                            self.player.thread.confirm();
                        }
                        self.notifications.success("Comment added!");
                    }
                    Err(message) => {
                        if still_present {
                            self.player.thread.roll_back(&temp_id, message.clone());
                        }
                        self.notifications.error(message);
                    }
                }
                Settled::Nothing
            }
        }
    }

    /// Back to a signed-out splash: navigation, lists, forms and toasts.
    pub fn sign_out(&mut self) {
        self.shell.logout();
        self.list.clear();
        self.player.reset();
        *self.upload = UploadForm::default();
        *self.edit = None;
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;

    #[derive(Default)]
    struct Parts {
        shell: Shell,
        list: VideoListState,
        player: PlayerState,
        upload: UploadForm,
        edit: Option<EditForm>,
        notifications: Notifications,
    }

    impl Parts {
        fn signed_in() -> Self {
            Self {
                shell: Shell::new(Some(jane())),
                ..Self::default()
            }
        }

        fn session(&mut self) -> Session<'_> {
            Session {
                shell: &mut self.shell,
                list: &mut self.list,
                player: &mut self.player,
                upload: &mut self.upload,
                edit: &mut self.edit,
                notifications: &mut self.notifications,
            }
        }

        fn toasts(&self) -> Vec<(ToastKind, &str)> {
            self.notifications
                .active()
                .iter()
                .map(|toast| (toast.kind, toast.message.as_str()))
                .collect()
        }
    }

    fn jane() -> Identity {
        Identity::from_name("Jane", "Doe").unwrap()
    }

    #[test]
    fn failed_list_load_raises_error_toast() {
        let mut parts = Parts::signed_in();
        let fetch = parts.list.begin_load(Some(&jane()), 0).unwrap();

        let settled = parts.session().apply(TaskEvent::VideosLoaded {
            generation: fetch.generation,
            result: Err("connection refused".into()),
        });

        assert_eq!(settled, Settled::List);
        assert_eq!(parts.toasts(), vec![(ToastKind::Error, VIDEOS_LOAD_FAILED)]);
    }

    #[test]
    fn superseded_list_failure_stays_quiet() {
        let mut parts = Parts::signed_in();
        let stale = parts.list.begin_load(Some(&jane()), 0).unwrap();
        let current = parts.list.begin_load(Some(&jane()), 1).unwrap();

        let settled = parts.session().apply(TaskEvent::VideosLoaded {
            generation: stale.generation,
            result: Err("timed out".into()),
        });
        assert_eq!(settled, Settled::Nothing);
        assert!(parts.toasts().is_empty());

        let settled = parts.session().apply(TaskEvent::VideosLoaded {
            generation: current.generation,
            result: Ok(Vec::new()),
        });
        assert_eq!(settled, Settled::List);
        assert!(parts.toasts().is_empty());
    }

    #[test]
    fn failed_comment_load_toasts_only_for_current_video() {
        let mut parts = Parts::signed_in();
        let stale = parts.player.thread.begin_load("v1");
        let current = parts.player.thread.begin_load("v2");

        let settled = parts.session().apply(TaskEvent::CommentsLoaded {
            generation: stale,
            result: Err("gone".into()),
        });
        assert_eq!(settled, Settled::Nothing);
        assert!(parts.toasts().is_empty());

        let settled = parts.session().apply(TaskEvent::CommentsLoaded {
            generation: current,
            result: Err("gone".into()),
        });
        assert_eq!(settled, Settled::Comments);
        assert_eq!(
            parts.toasts(),
            vec![(ToastKind::Error, COMMENTS_LOAD_FAILED)]
        );
    }

    #[test]
    fn rejected_comment_is_rolled_back_with_toast() {
        let mut parts = Parts::signed_in();
        let generation = parts.player.thread.begin_load("v1");
        parts.player.thread.finish_load(generation, Ok(Vec::new()));
        parts.player.thread.draft = "Great intro".into();
        let pending = parts
            .player
            .thread
            .begin_submit(&jane(), OffsetDateTime::now_utc())
            .unwrap();
        assert_eq!(parts.player.thread.comments().len(), 1);

        parts.session().apply(TaskEvent::CommentPosted {
            temp_id: pending.temp_id,
            result: Err("Server unavailable".into()),
        });

        assert!(parts.player.thread.comments().is_empty());
        assert_eq!(parts.player.thread.error(), Some("Server unavailable"));
        assert_eq!(parts.toasts(), vec![(ToastKind::Error, "Server unavailable")]);
    }

    #[test]
    fn sign_out_drops_pending_toasts() {
        let mut parts = Parts::signed_in();
        parts.notifications.error("Failed to load videos. Please try again.");
        parts.notifications.success("Comment added!");

        parts.session().sign_out();

        assert!(parts.toasts().is_empty());
        assert_eq!(parts.shell.screen(), Screen::Splash);
        assert!(parts.edit.is_none());
    }
}
