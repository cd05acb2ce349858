//! Time formatting for timer display.

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so 90 minutes reads `90:00`.
#[must_use]
pub fn format_seconds_as_timer(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format minutes as a short string (e.g., "25m", "3h 20m").
#[must_use]
pub fn format_minutes_as_hours_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Parse a duration like "25", "25m", "1h30m" or "2h" into whole minutes.
///
/// A bare number means minutes. Returns `None` for empty, zero or malformed
/// input.
#[must_use]
pub fn parse_minutes(s: &str) -> Option<u32> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<u32>() {
        return (minutes > 0).then_some(minutes);
    }

    let mut total: u32 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let num: u32 = current_num.parse().ok()?;
            current_num.clear();

            let minutes = match c {
                'h' => num.checked_mul(60)?,
                'm' => num,
                _ => return None,
            };
            total = total.checked_add(minutes)?;
        }
    }

    // Trailing number without unit is minutes.
    if !current_num.is_empty() {
        let num: u32 = current_num.parse().ok()?;
        total = total.checked_add(num)?;
    }

    (total > 0).then_some(total)
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
