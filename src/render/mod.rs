//! HTML rendering of profiles.

use std::collections::BTreeMap;

use crate::models::Profile;

const NO_DATA: &str = "n/a";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>

<head>
  <meta charset="utf-8">
  <title>%USERNAME%</title>
</head>

<body>
  <h2>%USERNAME%</h2>
  <strong>Favourite openings (White):</strong>
  <br>
  %WHITE_OPENINGS%
  <br>
  <strong>Favourite openings (Black):</strong>
  <br>
  %BLACK_OPENINGS%
  <br>
  <strong>Mate/Win:</strong> %MATE_WIN_RATIO% <br>
  <strong>Resign/Loss:</strong> %RESIGN_LOSS_RATIO% <br>
  <strong>Duration percentiles:</strong> <br> %DURATION_PERCENTILES% <br>
  <small>Based on %GAME_COUNT% games</small>
</body>

</html>
"#;

/// Render `profile` as a standalone HTML page.
pub fn render_profile(profile: &Profile) -> String {
    let user = html_escape::encode_text(&profile.user);
    let white = format_openings(&profile.openings_white);
    let black = format_openings(&profile.openings_black);
    let mate_win = format_ratio(profile.mate_win_ratio);
    let resign_loss = format_ratio(profile.resign_loss_ratio);
    let durations = format_percentiles(&profile.duration_percentiles);
    let game_count = profile.games_analyzed.to_string();

    fill_template(TEMPLATE, |name| match name {
        "USERNAME" => Some(user.as_ref()),
        "WHITE_OPENINGS" => Some(white.as_str()),
        "BLACK_OPENINGS" => Some(black.as_str()),
        "MATE_WIN_RATIO" => Some(mate_win.as_str()),
        "RESIGN_LOSS_RATIO" => Some(resign_loss.as_str()),
        "DURATION_PERCENTILES" => Some(durations.as_str()),
        "GAME_COUNT" => Some(game_count.as_str()),
        _ => None,
    })
}

/// Replace every `%NAME%` in `template` for which `value` has an entry.
///
/// Substituted text is written straight to the output and never scanned
/// again, so values may themselves contain `%NAME%` sequences.
fn fill_template<'a, F>(template: &str, value: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('%').and_then(|end| Some((end, value(&after[..end])?))) {
            Some((end, text)) => {
                out.push_str(text);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn format_openings(openings: &[String]) -> String {
    if openings.is_empty() {
        return NO_DATA.to_string();
    }
    openings
        .iter()
        .map(|o| html_escape::encode_text(o))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Two decimals, or "n/a" when undefined.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => NO_DATA.to_string(),
    }
}

fn format_percentiles(percentiles: &BTreeMap<u32, u32>) -> String {
    if percentiles.is_empty() {
        return NO_DATA.to_string();
    }
    percentiles
        .iter()
        .map(|(pc, moves)| format!("{}%: {}", pc, moves))
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            user: "alice".to_string(),
            openings_white: vec!["e4 e5 Nf3 Nc6".to_string(), "d4 d5 c4 e6".to_string()],
            openings_black: vec!["e4 c5 Nf3 d6".to_string()],
            mate_win_ratio: Some(0.25),
            resign_loss_ratio: Some(2.0 / 3.0),
            duration_percentiles: BTreeMap::from([(90, 52), (50, 31), (75, 40)]),
            games_analyzed: 18,
        }
    }

    #[test]
    fn test_render_profile() {
        let html = render_profile(&sample_profile());

        assert!(html.contains("<title>alice</title>"));
        assert!(html.contains("<h2>alice</h2>"));
        assert!(html.contains("e4 e5 Nf3 Nc6<br>d4 d5 c4 e6"));
        assert!(html.contains("<strong>Mate/Win:</strong> 0.25 <br>"));
        assert!(html.contains("<strong>Resign/Loss:</strong> 0.67 <br>"));
        assert!(html.contains("50%: 31<br>75%: 40<br>90%: 52"));
        assert!(html.contains("Based on 18 games"));
        assert!(!html.contains("%USERNAME%"));
        assert!(!html.contains("%GAME_COUNT%"));
    }

    #[test]
    fn test_render_empty_profile() {
        let html = render_profile(&Profile::empty("bob"));

        assert!(html.contains("<strong>Mate/Win:</strong> n/a <br>"));
        assert!(html.contains("<strong>Resign/Loss:</strong> n/a <br>"));
        assert!(html.contains("<strong>Duration percentiles:</strong> <br> n/a <br>"));
        assert!(!html.contains("NaN"));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let mut profile = Profile::empty("<script>x</script>");
        profile.openings_white = vec!["e4 \"e5\"".to_string()];

        let html = render_profile(&profile);

        assert!(!html.contains("<script>"));
        assert!(html.contains("<title>&lt;script&gt;x&lt;/script&gt;</title>"));
        assert!(html.contains("<h2>&lt;script&gt;x&lt;/script&gt;</h2>"));
        assert!(html.contains("e4 \"e5\""));
    }

    #[test]
    fn test_render_escapes_ampersand_in_openings() {
        let mut profile = Profile::empty("alice");
        profile.openings_black = vec!["e4 <b>&c5".to_string()];

        let html = render_profile(&profile);
        assert!(html.contains("e4 &lt;b&gt;&amp;c5"));
    }

    #[test]
    fn test_render_user_text_is_not_a_placeholder() {
        let mut profile = Profile::empty("%WHITE_OPENINGS%");
        profile.openings_white = vec!["e4 e5 %GAME_COUNT%".to_string()];
        profile.games_analyzed = 3;

        let html = render_profile(&profile);
        assert!(html.contains("<h2>%WHITE_OPENINGS%</h2>"));
        assert!(html.contains("e4 e5 %GAME_COUNT%"));
        assert!(html.contains("Based on 3 games"));
    }

    #[test]
    fn test_fill_template_leaves_unknown_markers() {
        let out = fill_template("50% of %NAME% is %OTHER%", |name| match name {
            "NAME" => Some("x"),
            _ => None,
        });
        assert_eq!(out, "50% of x is %OTHER%");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(1.0)), "1.00");
        assert_eq!(format_ratio(Some(0.5)), "0.50");
        assert_eq!(format_ratio(None), "n/a");
    }
}
