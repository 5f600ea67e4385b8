use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const TEMPLATE: &str = "flight {prefix} [{wide_bar:.green/white}] {pos}/{len} {msg}";

/// Returns a hidden bar for scanning flight number `flight` in `dir`.
///
/// Its length is unknown until the flight's images are listed; add it
/// to a `MultiProgress` to draw it.
pub fn flight_bar(flight: usize, dir: &Path) -> ProgressBar {
    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::hidden()
        .with_style(style)
        .with_prefix(flight.to_string())
        .with_message(dir.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::flight_bar;
    use std::path::Path;

    #[test]
    fn test_flight_bar() {
        let pb = flight_bar(3, Path::new("/card/DCIM/100MEDIA"));
        assert_eq!(pb.prefix(), "3");
        assert_eq!(pb.message(), "/card/DCIM/100MEDIA");
        assert_eq!(pb.length(), None);
        pb.set_length(12);
        pb.inc(5);
        assert_eq!(pb.position(), 5);
    }
}
