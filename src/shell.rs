use tracing::info;

use crate::api::Video;
use crate::identity::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Splash,
    List,
    Player,
}

/// Navigation state: who is signed in, which video is open, which modal is
/// showing, and the refresh token the list watches.
#[derive(Debug, Default)]
pub struct Shell {
    identity: Option<Identity>,
    selected: Option<Video>,
    upload_open: bool,
    edit_open: bool,
    refresh_token: u64,
    pub profile_menu_open: bool,
}

impl Shell {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        match (&self.identity, &self.selected) {
            (None, _) => Screen::Splash,
            (Some(_), None) => Screen::List,
            (Some(_), Some(_)) => Screen::Player,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.selected.as_ref()
    }

    pub fn is_upload_open(&self) -> bool {
        self.upload_open && self.identity.is_some()
    }

    pub fn is_edit_open(&self) -> bool {
        self.edit_open && self.selected.is_some()
    }

    pub fn refresh_token(&self) -> u64 {
        self.refresh_token
    }

    /// Sets the identity once. Returns false if one is already set.
    pub fn sign_in(&mut self, identity: Identity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        info!(user = %identity, "signed in");
        self.identity = Some(identity);
        true
    }

    pub fn select_video(&mut self, video: Video) {
        if self.identity.is_some() {
            self.selected = Some(video);
        }
    }

    pub fn back_to_list(&mut self) {
        self.selected = None;
        self.edit_open = false;
    }

    pub fn open_upload(&mut self) {
        if self.identity.is_some() {
            self.upload_open = true;
            self.profile_menu_open = false;
        }
    }

    pub fn close_upload(&mut self) {
        self.upload_open = false;
    }

    pub fn video_uploaded(&mut self) {
        self.upload_open = false;
        self.bump_refresh();
    }

    /// Opens the edit overlay for the open video. Returns false when no video
    /// is open.
    pub fn open_edit(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.edit_open = true;
        true
    }

    pub fn close_edit(&mut self) {
        self.edit_open = false;
    }

    pub fn video_edited(&mut self, updated: Video) {
        if self.selected.is_some() {
            self.selected = Some(updated);
        }
        self.edit_open = false;
        self.bump_refresh();
    }

    /// Drops every piece of session state. Persisted prefs are the caller's
    /// job.
    pub fn logout(&mut self) {
        if let Some(identity) = &self.identity {
            info!(user = %identity, "signed out");
        }
        *self = Self::default();
    }

    fn bump_refresh(&mut self) {
        self.refresh_token = self.refresh_token.wrapping_add(1);
        info!(refresh_token = self.refresh_token, "video list refresh requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str) -> Video {
        Video {
            id: "v1".into(),
            user_id: "jane_doe".into(),
            title: title.into(),
            description: "desc".into(),
            video_url: "https://cdn.example.com/v1.mp4".into(),
            thumbnail_url: None,
            created_at: String::new(),
        }
    }

    fn signed_in() -> Shell {
        Shell::new(Some(Identity::from_name("Jane", "Doe").unwrap()))
    }

    #[test]
    fn splash_until_identity_set() {
        let mut shell = Shell::new(None);
        assert_eq!(shell.screen(), Screen::Splash);
        shell.select_video(video("x"));
        assert_eq!(shell.screen(), Screen::Splash);
        shell.open_upload();
        assert!(!shell.is_upload_open());

        assert!(shell.sign_in(Identity::from_name("Jane", "Doe").unwrap()));
        assert_eq!(shell.screen(), Screen::List);
        assert!(!shell.sign_in(Identity::from_name("Sam", "Lee").unwrap()));
        assert_eq!(shell.identity().unwrap().as_str(), "jane_doe");
    }

    #[test]
    fn list_and_player_toggle() {
        let mut shell = signed_in();
        shell.select_video(video("Traits"));
        assert_eq!(shell.screen(), Screen::Player);
        assert_eq!(shell.selected_video().unwrap().title, "Traits");
        shell.back_to_list();
        assert_eq!(shell.screen(), Screen::List);
        assert!(!shell.open_edit());
    }

    #[test]
    fn upload_bumps_refresh_token() {
        let mut shell = signed_in();
        shell.open_upload();
        assert!(shell.is_upload_open());
        shell.video_uploaded();
        assert!(!shell.is_upload_open());
        assert_eq!(shell.refresh_token(), 1);

        shell.open_upload();
        shell.close_upload();
        assert_eq!(shell.refresh_token(), 1);
    }

    #[test]
    fn edit_replaces_selected_video_in_place() {
        let mut shell = signed_in();
        shell.select_video(video("Traits"));
        assert!(shell.open_edit());
        assert!(shell.is_edit_open());
        shell.video_edited(video("Traits and generics"));
        assert!(!shell.is_edit_open());
        assert_eq!(shell.screen(), Screen::Player);
        assert_eq!(shell.selected_video().unwrap().title, "Traits and generics");
        assert_eq!(shell.refresh_token(), 1);
    }

    #[test]
    fn logout_resets_everything() {
        let mut shell = signed_in();
        shell.select_video(video("Traits"));
        shell.open_edit();
        shell.logout();
        assert_eq!(shell.screen(), Screen::Splash);
        assert!(shell.identity().is_none());
        assert!(!shell.is_edit_open());
        assert_eq!(shell.refresh_token(), 0);
    }
}
