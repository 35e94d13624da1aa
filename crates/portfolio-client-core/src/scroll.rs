//! Scroll- and viewport-driven page effects.
//!
//! All of these are recomputed from the current scroll position on every
//! event; the DOM layer keeps no state beyond the styles it writes.

use crate::config::ScrollThresholds;

pub fn navbar_is_scrolled(scroll_y: f64, thresholds: &ScrollThresholds) -> bool {
    scroll_y > thresholds.navbar_px
}

pub fn scroll_to_top_visible(scroll_y: f64, thresholds: &ScrollThresholds) -> bool {
    scroll_y > thresholds.scroll_to_top_px
}

/// Percentage of the scrollable height already passed, clamped to 0..=100.
/// A page that fits the viewport reports zero.
pub fn reading_progress_percent(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

pub fn progress_width_css(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Unparseable or non-finite `data-speed` values use the default speed.
pub fn parse_parallax_speed(raw: Option<&str>, default_speed: f64) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|speed| speed.is_finite())
        .unwrap_or(default_speed)
}

pub fn parallax_transform(scroll_y: f64, speed: f64) -> String {
    format!("translateY({}px)", scroll_y * speed)
}

/// Scroll target for an in-page anchor so the fixed navbar does not cover it.
pub fn anchor_scroll_top(target_offset_top: f64, navbar_height: f64) -> f64 {
    (target_offset_top - navbar_height).max(0.0)
}

/// `#` alone is a placeholder link and is left to the browser.
pub fn is_in_page_anchor(href: &str) -> bool {
    href.starts_with('#') && href.len() > 1
}

pub fn intersects_viewport(rect_top: f64, rect_bottom: f64, viewport_height: f64) -> bool {
    rect_top < viewport_height && rect_bottom > 0.0
}

/// Fires once, then stays spent.
#[derive(Debug, Clone, Default)]
pub struct OnceTrigger {
    fired: bool,
}

impl OnceTrigger {
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Leading-integer parse of a `data-target` attribute ("1,200+" is not a
/// number, "150+" is 150).
pub fn parse_counter_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(digits.len(), |(index, _)| index);
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| value * sign)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    Continue(i64),
    Done(i64),
}

/// Linear count-up from zero in fixed per-frame steps.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: i64,
    step: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: i64, duration_ms: u32, frame_ms: u32) -> Self {
        let frames = f64::from(duration_ms.max(1)) / f64::from(frame_ms.max(1));
        Self {
            target,
            step: target as f64 / frames.max(1.0),
            current: 0.0,
            finished: false,
        }
    }

    pub fn next_frame(&mut self) -> CounterFrame {
        if self.finished || self.target <= 0 {
            self.finished = true;
            return CounterFrame::Done(self.target);
        }
        self.current += self.step;
        if self.current < self.target as f64 {
            CounterFrame::Continue(self.current.floor() as i64)
        } else {
            self.finished = true;
            CounterFrame::Done(self.target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_and_scroll_to_top_thresholds_are_strict() {
        let thresholds = ScrollThresholds::default();
        assert!(!navbar_is_scrolled(50.0, &thresholds));
        assert!(navbar_is_scrolled(50.5, &thresholds));
        assert!(!scroll_to_top_visible(500.0, &thresholds));
        assert!(scroll_to_top_visible(501.0, &thresholds));
    }

    #[test]
    fn reading_progress_is_clamped() {
        assert_eq!(reading_progress_percent(0.0, 2_000.0, 1_000.0), 0.0);
        assert_eq!(reading_progress_percent(500.0, 2_000.0, 1_000.0), 50.0);
        assert_eq!(reading_progress_percent(1_400.0, 2_000.0, 1_000.0), 100.0);
        assert_eq!(reading_progress_percent(10.0, 800.0, 1_000.0), 0.0);
        assert_eq!(progress_width_css(33.333), "33.33%");
    }

    #[test]
    fn parallax_speed_defaults_when_missing_or_invalid() {
        assert_eq!(parse_parallax_speed(None, 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some("fast"), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some("NaN"), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some(" 0.25 "), 0.5), 0.25);
        assert_eq!(parallax_transform(200.0, 0.25), "translateY(50px)");
    }

    #[test]
    fn anchor_helpers() {
        assert!(is_in_page_anchor("#about"));
        assert!(!is_in_page_anchor("#"));
        assert!(!is_in_page_anchor("/blog/#about"));
        assert_eq!(anchor_scroll_top(900.0, 72.0), 828.0);
        assert_eq!(anchor_scroll_top(10.0, 72.0), 0.0);
    }

    #[test]
    fn once_trigger_fires_once() {
        let mut trigger = OnceTrigger::default();
        assert!(trigger.fire());
        assert!(!trigger.fire());
        assert!(!trigger.fire());
    }

    #[test]
    fn counter_target_parsing() {
        assert_eq!(parse_counter_target("150"), Some(150));
        assert_eq!(parse_counter_target(" 150+ "), Some(150));
        assert_eq!(parse_counter_target("-3"), Some(-3));
        assert_eq!(parse_counter_target("abc"), None);
        assert_eq!(parse_counter_target(""), None);
    }

    #[test]
    fn counter_counts_up_and_lands_on_target() {
        let mut counter = CounterAnimation::new(100, 2_000, 16);
        let mut frames = 0;
        let mut last = 0;
        loop {
            frames += 1;
            match counter.next_frame() {
                CounterFrame::Continue(value) => {
                    assert!(value >= last);
                    assert!(value < 100);
                    last = value;
                }
                CounterFrame::Done(value) => {
                    assert_eq!(value, 100);
                    break;
                }
            }
            assert!(frames < 1_000);
        }
        assert!(frames >= 120);
        assert_eq!(counter.next_frame(), CounterFrame::Done(100));
    }

    #[test]
    fn non_positive_counter_finishes_immediately() {
        let mut counter = CounterAnimation::new(0, 2_000, 16);
        assert_eq!(counter.next_frame(), CounterFrame::Done(0));
    }
}
