//! Structured argument extraction from trailing user text.

use std::sync::OnceLock;

use regex::Regex;

use super::types::ExtractedArguments;

/// Bare words recognised as model profile names.
pub const PROFILES: &[&str] = &["quality", "balanced", "budget"];

fn phase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("phase pattern is valid"))
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[vV]\d+(\.\d+)*$").expect("version pattern is valid"))
}

/// Parse `text` into [`ExtractedArguments`]. `raw` is `text` unchanged.
///
/// Grammar, applied token by token:
/// - `--name` is a flag; `--profile X` also sets the profile to `X`
/// - the first `N` or `N.M` token is the phase number (`phase 3` works too)
/// - the first `vN[.N..]` token is the version
/// - a bare profile name sets the profile
/// - everything else forms the description
pub fn extract_arguments(text: &str) -> ExtractedArguments {
    let mut args = ExtractedArguments {
        raw: text.to_string(),
        ..Default::default()
    };
    let mut rest: Vec<&str> = Vec::new();

    let mut tokens = text.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if let Some(flag) = token.strip_prefix("--") {
            if flag.is_empty() {
                continue;
            }
            if let Some((name, value)) = flag.split_once('=') {
                if name == "profile" && !value.is_empty() && args.profile.is_none() {
                    args.profile = Some(value.to_lowercase());
                }
                args.flags.push(format!("--{name}"));
                continue;
            }
            if flag == "profile" {
                if let Some(value) = tokens.next_if(|t| !t.starts_with("--")) {
                    args.profile.get_or_insert_with(|| value.to_lowercase());
                }
            }
            args.flags.push(token.to_string());
            continue;
        }

        let bare = token.trim_end_matches([',', '.', ';', ':', '!', '?']);
        let lower = bare.to_lowercase();

        if args.phase_number.is_none() && phase_re().is_match(bare) {
            args.phase_number = Some(bare.to_string());
            if rest.last().is_some_and(|w| w.eq_ignore_ascii_case("phase")) {
                rest.pop();
            }
            continue;
        }
        if args.version.is_none() && version_re().is_match(bare) {
            args.version = Some(lower);
            continue;
        }
        if args.profile.is_none() && PROFILES.contains(&lower.as_str()) {
            args.profile = Some(lower);
            continue;
        }
        rest.push(token);
    }

    let description = rest.join(" ");
    if !description.is_empty() {
        args.description = Some(description);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_empty_fields() {
        let args = extract_arguments("");
        assert_eq!(args, ExtractedArguments::default());
    }

    #[test]
    fn phase_number_and_flags() {
        let args = extract_arguments("3 --flag");
        assert_eq!(args.phase_number.as_deref(), Some("3"));
        assert_eq!(args.flags, vec!["--flag"]);
        assert_eq!(args.description, None);
        assert_eq!(args.raw, "3 --flag");
    }

    #[test]
    fn phase_keyword_is_consumed() {
        let args = extract_arguments("plan phase 2.1 carefully");
        assert_eq!(args.phase_number.as_deref(), Some("2.1"));
        assert_eq!(args.description.as_deref(), Some("plan carefully"));
    }

    #[test]
    fn zero_padded_phase_is_kept_verbatim() {
        let args = extract_arguments("execute 05");
        assert_eq!(args.phase_number.as_deref(), Some("05"));
    }

    #[test]
    fn version_token() {
        let args = extract_arguments("new milestone V1.2 for payments");
        assert_eq!(args.version.as_deref(), Some("v1.2"));
        assert_eq!(args.description.as_deref(), Some("new milestone for payments"));
        assert_eq!(args.phase_number, None);
    }

    #[test]
    fn profile_from_flag_value() {
        let args = extract_arguments("--profile budget 4");
        assert_eq!(args.profile.as_deref(), Some("budget"));
        assert_eq!(args.flags, vec!["--profile"]);
        assert_eq!(args.phase_number.as_deref(), Some("4"));
    }

    #[test]
    fn profile_from_equals_flag() {
        let args = extract_arguments("--profile=Quality");
        assert_eq!(args.profile.as_deref(), Some("quality"));
        assert_eq!(args.flags, vec!["--profile"]);
    }

    #[test]
    fn bare_profile_word() {
        let args = extract_arguments("switch to balanced");
        assert_eq!(args.profile.as_deref(), Some("balanced"));
        assert_eq!(args.description.as_deref(), Some("switch to"));
    }

    #[test]
    fn free_text_becomes_description() {
        let args = extract_arguments("fix the login redirect bug");
        assert_eq!(args.description.as_deref(), Some("fix the login redirect bug"));
        assert!(args.flags.is_empty());
        assert_eq!(args.phase_number, None);
        assert_eq!(args.version, None);
        assert_eq!(args.profile, None);
    }

    #[test]
    fn only_first_number_is_phase() {
        let args = extract_arguments("phase 3, then 4");
        assert_eq!(args.phase_number.as_deref(), Some("3"));
        assert_eq!(args.description.as_deref(), Some("then 4"));
    }

    #[test]
    fn raw_preserves_input_exactly() {
        let text = "  2  --skip-research  ";
        assert_eq!(extract_arguments(text).raw, text);
    }
}
