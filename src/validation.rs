use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

pub fn is_valid_email(string: &str) -> Result<(), String> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
        r#"^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#
    ).expect("email pattern is a valid regex")
    });
    match RE.is_match(&string.trim().to_lowercase()) {
        true => Ok(()),
        false => Err("invalid email".to_string()),
    }
}

/// Checks that `url` is an absolute http(s) URL, as expected for GitHub and
/// LinkedIn profile links.
pub fn is_valid_profile_url(string: &str) -> Result<(), String> {
    match Url::parse(string.trim()) {
        Ok(url)
            if matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some() =>
        {
            Ok(())
        }
        _ => Err("invalid profile link".to_string()),
    }
}

/// Case-insensitive suffix match, used to restrict sign-in to an
/// institutional email domain (e.g. `@adypu.edu.in`).
pub fn has_domain_suffix(email: &str, suffix: &str) -> bool {
    email
        .trim()
        .to_lowercase()
        .ends_with(&suffix.trim().to_lowercase())
}

pub fn digits_only(string: &str) -> String {
    string.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
#[test]
fn test_email() {
    assert!(is_valid_email("hello@example.com").is_ok());
    assert!(is_valid_email("Ada.Leader@ADYPU.edu.in").is_ok());
    assert!(is_valid_email("not an email").is_err());
    assert!(is_valid_email("someone@").is_err());
}

#[cfg(test)]
#[test]
fn test_profile_url() {
    assert!(is_valid_profile_url("https://github.com/octocat").is_ok());
    assert!(is_valid_profile_url("http://linkedin.com/in/someone").is_ok());
    assert!(is_valid_profile_url("github.com/octocat").is_err());
    assert!(is_valid_profile_url("ftp://github.com/octocat").is_err());
}

#[cfg(test)]
#[test]
fn test_domain_suffix() {
    assert!(has_domain_suffix("ada@adypu.edu.in", "@adypu.edu.in"));
    assert!(has_domain_suffix("Ada@ADYPU.EDU.IN ", "@adypu.edu.in"));
    assert!(!has_domain_suffix("ada@gmail.com", "@adypu.edu.in"));
    assert!(!has_domain_suffix("ada@notadypu.edu.in.evil.com", "@adypu.edu.in"));
}

#[cfg(test)]
#[test]
fn test_digits_only() {
    assert_eq!(digits_only("+91 98765-43210"), "919876543210");
    assert_eq!(digits_only("abc"), "");
}
