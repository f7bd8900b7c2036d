//! Page progress bar

use indicatif::{ProgressBar, ProgressStyle};

/// Create a bar counting fetched pages out of `total_pages`
///
/// Returns `None` if quiet mode is enabled.
pub fn create_progress_bar(total_pages: u64, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let bar = ProgressBar::new(total_pages);
    let style = ProgressStyle::default_bar()
        .template("{bar:40.cyan/blue} {percent}% | ETA: {eta} | {pos}/{len} pages")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█░ ");
    bar.set_style(style);
    Some(bar)
}
