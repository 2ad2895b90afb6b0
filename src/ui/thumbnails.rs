use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use directories::ProjectDirs;
use egui::{ColorImage, Context, TextureHandle, TextureOptions, Vec2};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::api::Video;

pub const CARD_THUMB_WIDTH: f32 = 280.0;
pub const CARD_THUMB_HEIGHT: f32 = 158.0;

/// Thumbnails for the videos currently in the list.
///
/// [`ThumbnailCache::sync`] runs once per settled list load: it forgets
/// videos that left the list (in memory and on disk) and starts one job per
/// new `(video, url)` pair. A job reads the disk copy if there is one and
/// downloads otherwise. Disk files are named after the video id plus a hash
/// of the URL, so a changed URL never serves a stale image.
pub struct ThumbnailCache {
    slots: HashMap<String, Slot>,
    client: reqwest::Client,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
    dir: PathBuf,
}

enum Slot {
    NoUrl,
    Pending { url: String },
    Shown { url: String, texture: TextureHandle, size: Vec2 },
    Broken { url: String },
}

impl Slot {
    fn url(&self) -> Option<&str> {
        match self {
            Slot::NoUrl => None,
            Slot::Pending { url } | Slot::Shown { url, .. } | Slot::Broken { url } => Some(url),
        }
    }
}

pub struct ThumbnailRef {
    pub texture: TextureHandle,
    pub display_size: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Missing,
    Loading,
    Failed,
}

struct Loaded {
    video_id: String,
    url: String,
    image: Result<ColorImage, String>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        let dir = ProjectDirs::from("com", "eduwatch", "EduWatch")
            .map(|dirs| dirs.cache_dir().join("thumbnails"))
            .unwrap_or_else(|| PathBuf::from("thumbnails"));
        let (tx, rx) = mpsc::channel();
        Self {
            slots: HashMap::new(),
            client: reqwest::Client::new(),
            tx,
            rx,
            dir,
        }
    }

    /// Matches the cache to `videos` and starts loads for new thumbnails.
    pub fn sync(&mut self, videos: &[Video], ctx: &Context, runtime: &Runtime) {
        let keep: HashSet<&str> = videos.iter().map(|video| video.id.as_str()).collect();
        self.slots.retain(|id, _| keep.contains(id.as_str()));
        let wanted: HashSet<String> = videos
            .iter()
            .filter_map(|video| Some(cache_file_name(&video.id, video.thumbnail()?)))
            .collect();
        match prune_dir(&self.dir, &wanted) {
            Ok(0) => {}
            Ok(removed) => info!(removed, "pruned cached thumbnails"),
            Err(err) => debug!(error = %err, "thumbnail cache dir not pruned"),
        }

        for video in videos {
            let Some(url) = video.thumbnail() else {
                self.slots.insert(video.id.clone(), Slot::NoUrl);
                continue;
            };
            let current = self.slots.get(&video.id).and_then(Slot::url);
            if current == Some(url) {
                continue;
            }
            self.slots.insert(
                video.id.clone(),
                Slot::Pending {
                    url: url.to_owned(),
                },
            );
            self.spawn_load(video.id.clone(), url.to_owned(), ctx.clone(), runtime);
        }
    }

    fn spawn_load(&self, video_id: String, url: String, ctx: Context, runtime: &Runtime) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let path = self.dir.join(cache_file_name(&video_id, &url));
        runtime.spawn(async move {
            let image = load_or_download(&client, &url, &path).await;
            let _ = tx.send(Loaded {
                video_id,
                url,
                image,
            });
            ctx.request_repaint();
        });
    }

    /// Turns finished loads into textures. Call once per frame.
    pub fn update(&mut self, ctx: &Context) {
        while let Ok(loaded) = self.rx.try_recv() {
            let Some(slot) = self.slots.get_mut(&loaded.video_id) else {
                continue;
            };
            let is_current =
                matches!(slot, Slot::Pending { url } if *url == loaded.url);
            if !is_current {
                continue;
            }
            *slot = match loaded.image {
                Ok(image) => {
                    let [w, h] = image.size;
                    let texture = ctx.load_texture(
                        format!("thumbnail://{}", loaded.video_id),
                        image,
                        TextureOptions::LINEAR,
                    );
                    Slot::Shown {
                        url: loaded.url,
                        texture,
                        size: Vec2::new(w as f32, h as f32),
                    }
                }
                Err(err) => {
                    debug!(video_id = %loaded.video_id, error = %err, "thumbnail unavailable");
                    Slot::Broken { url: loaded.url }
                }
            };
        }
    }

    pub fn thumbnail(&self, video_id: &str, max: Vec2) -> Option<ThumbnailRef> {
        match self.slots.get(video_id)? {
            Slot::Shown { texture, size, .. } => Some(ThumbnailRef {
                texture: texture.clone(),
                display_size: fit_within(*size, max),
            }),
            _ => None,
        }
    }

    pub fn status(&self, video_id: &str) -> ThumbnailStatus {
        match self.slots.get(video_id) {
            Some(Slot::Pending { .. }) => ThumbnailStatus::Loading,
            Some(Slot::Broken { .. }) => ThumbnailStatus::Failed,
            _ => ThumbnailStatus::Missing,
        }
    }

    /// Drops textures. Disk copies stay for the next sign-in.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn fit_within(original: Vec2, max: Vec2) -> Vec2 {
    let scale = (max.x / original.x).min(max.y / original.y).min(1.0);
    original * scale
}

async fn load_or_download(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<ColorImage, String> {
    if let Ok(bytes) = tokio::fs::read(path).await {
        match decode(&bytes) {
            Ok(image) => return Ok(image),
            Err(err) => debug!(path = %path.display(), error = %err, "discarding unreadable thumbnail"),
        }
    }

    let bytes = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|err| err.to_string())?
        .bytes()
        .await
        .map_err(|err| err.to_string())?;
    let image = decode(&bytes)?;

    if let Some(parent) = path.parent() {
        let written = match tokio::fs::create_dir_all(parent).await {
            Ok(()) => tokio::fs::write(path, &bytes).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            warn!(path = %path.display(), error = %err, "failed to cache thumbnail");
        }
    }
    Ok(image)
}

fn decode(bytes: &[u8]) -> Result<ColorImage, String> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|err| err.to_string())?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// `<id>-<url hash>.img`, with anything outside `[A-Za-z0-9_-]` in the id
/// replaced so ids can't escape the cache dir.
fn cache_file_name(video_id: &str, url: &str) -> String {
    let safe_id: String = video_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe_id}-{:016x}.img", fnv1a(url.as_bytes()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Deletes `.img` files in `dir` whose names are not in `wanted`. Returns how
/// many were removed.
fn prune_dir(dir: &Path, wanted: &HashSet<String>) -> std::io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "img") {
            continue;
        }
        let known = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| wanted.contains(name));
        if !known {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_confined_and_url_specific() {
        let name = cache_file_name("../v1 2", "https://cdn.example.com/a.jpg");
        assert!(name.starts_with("___v1_2-"));
        assert!(name.ends_with(".img"));
        assert!(!name.contains('/'));
        assert_ne!(name, cache_file_name("../v1 2", "https://cdn.example.com/b.jpg"));
        assert_eq!(name, cache_file_name("../v1 2", "https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn large_images_shrink_small_ones_do_not() {
        let max = Vec2::new(CARD_THUMB_WIDTH, CARD_THUMB_HEIGHT);
        assert_eq!(fit_within(Vec2::new(100.0, 50.0), max), Vec2::new(100.0, 50.0));
        let scaled = fit_within(Vec2::new(1280.0, 720.0), max);
        assert!(scaled.x <= CARD_THUMB_WIDTH && scaled.y <= CARD_THUMB_HEIGHT);
        assert!((scaled.x / scaled.y - 1280.0 / 720.0).abs() < 0.01);
    }

    #[test]
    fn prune_keeps_only_current_thumbnails() {
        let dir = std::env::temp_dir().join(format!("eduwatch-thumbs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let kept = cache_file_name("v1", "https://cdn.example.com/v1.jpg");
        let stale = cache_file_name("v2", "https://cdn.example.com/v2.jpg");
        let replaced = cache_file_name("v1", "https://cdn.example.com/old.jpg");
        for name in [&kept, &stale, &replaced, &"notes.txt".to_owned()] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let wanted = HashSet::from([kept.clone()]);
        assert_eq!(prune_dir(&dir, &wanted).unwrap(), 2);
        assert!(dir.join(&kept).exists());
        assert!(!dir.join(&stale).exists());
        assert!(!dir.join(&replaced).exists());
        assert!(dir.join("notes.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
