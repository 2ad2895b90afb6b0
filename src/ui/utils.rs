use time::OffsetDateTime;

use crate::api::types::parse_timestamp;

/// "3 days ago" style label. Unparseable input is shown as-is.
pub fn format_time_ago(raw: &str, now: OffsetDateTime) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.trim().to_owned();
    };
    let secs = (now - then).whole_seconds();
    if secs < 60 {
        return "just now".to_owned();
    }
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let (value, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 7 {
        (days, "day")
    } else if days < 35 {
        (days / 7, "week")
    } else if days < 365 {
        ((days / 30).clamp(1, 11), "month")
    } else {
        (days / 365, "year")
    };
    format!("{} {}{} ago", value, unit, if value == 1 { "" } else { "s" })
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Opens `url` in mpv or VLC at `speed`, falling back to a browser window
/// and then the system opener.
pub fn open_video_url(url: &str, speed: f32) -> Result<(), String> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        match launch_first_available(url, speed) {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                return open::that(url)
                    .map(|_| ())
                    .map_err(|e| format!("{err}; fallback failed: {e}"));
            }
            Err(_) => {}
        }
    }
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    let _ = speed;

    open::that(url).map(|_| ()).map_err(|err| err.to_string())
}

/// Launch commands in preference order. Only the media players honour speed.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn launch_candidates(url: &str, speed: f32) -> Vec<(&'static str, Vec<String>)> {
    vec![
        ("mpv", vec![format!("--speed={speed}"), url.to_owned()]),
        ("vlc", vec![format!("--rate={speed}"), url.to_owned()]),
        ("google-chrome", vec!["--new-window".to_owned(), url.to_owned()]),
        ("chromium", vec!["--new-window".to_owned(), url.to_owned()]),
    ]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn launch_first_available(url: &str, speed: f32) -> std::io::Result<()> {
    use std::io::ErrorKind;
    use std::process::Command;

    for (program, args) in launch_candidates(url, speed) {
        match Command::new(program).args(&args).spawn() {
            Ok(_) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::NotFound,
        "no supported player or browser command found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn relative_labels() {
        let now = datetime!(2024-06-01 12:00 UTC);
        assert_eq!(format_time_ago("2024-06-01T11:59:30Z", now), "just now");
        assert_eq!(format_time_ago("2024-06-01T11:59:00Z", now), "1 minute ago");
        assert_eq!(format_time_ago("2024-06-01T09:00:00", now), "3 hours ago");
        assert_eq!(format_time_ago("2024-05-31T12:00:00Z", now), "1 day ago");
        assert_eq!(format_time_ago("2024-05-18T12:00:00Z", now), "2 weeks ago");
        assert_eq!(format_time_ago("2024-03-01T12:00:00Z", now), "3 months ago");
        assert_eq!(format_time_ago("2023-06-05T12:00:00Z", now), "11 months ago");
        assert_eq!(format_time_ago("2023-06-01T12:00:00Z", now), "1 year ago");
        assert_eq!(format_time_ago("2022-05-01T12:00:00Z", now), "2 years ago");
    }

    #[test]
    fn future_and_garbage_timestamps() {
        let now = datetime!(2024-06-01 12:00 UTC);
        assert_eq!(format_time_ago("2024-06-02T12:00:00Z", now), "just now");
        assert_eq!(format_time_ago(" someday ", now), "someday");
    }

    #[test]
    fn media_players_get_the_chosen_speed() {
        let candidates = launch_candidates("https://cdn.example.com/7.mp4", 1.5);
        let programs: Vec<_> = candidates.iter().map(|(program, _)| *program).collect();
        assert_eq!(programs, vec!["mpv", "vlc", "google-chrome", "chromium"]);
        assert_eq!(candidates[0].1, vec!["--speed=1.5", "https://cdn.example.com/7.mp4"]);
        assert_eq!(candidates[1].1, vec!["--rate=1.5", "https://cdn.example.com/7.mp4"]);
        assert!(candidates[2].1.iter().all(|arg| !arg.contains("1.5")));

        let normal = launch_candidates("https://cdn.example.com/7.mp4", 1.0);
        assert_eq!(normal[0].1[0], "--speed=1");
    }

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo wörld", 6), "héllo…");
    }
}
