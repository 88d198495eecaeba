use common::FamilyRef;
use std::time::Duration;

/// How long a copy/share status message stays visible.
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Where the displayed family came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilySource {
    Query,
    Session,
}

/// Collects the family fields out of decoded query parameters.
///
/// Unrelated parameters are ignored; the last occurrence of a field wins.
pub fn family_from_query<I, K, V>(params: I) -> FamilyRef
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut family = FamilyRef::default();
    for (key, value) in params {
        match key.as_ref() {
            FamilyRef::ID_PARAM => family.family_id = value.into(),
            FamilyRef::NAME_PARAM => family.family_name = value.into(),
            FamilyRef::CODE_PARAM => family.family_code = value.into(),
            _ => {}
        }
    }
    family
}

/// Picks the family to display: a complete query wins over a complete
/// session entry. `None` means the empty state.
pub fn resolve_family(
    query: FamilyRef,
    session: Option<FamilyRef>,
) -> Option<(FamilyRef, FamilySource)> {
    if query.is_complete() {
        return Some((query, FamilySource::Query));
    }
    session
        .filter(FamilyRef::is_complete)
        .map(|family| (family, FamilySource::Session))
}

/// Outcome of a clipboard action, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    CodeCopied,
    LinkCopied,
    Failed,
}

impl CopyStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CodeCopied => "Family code copied to clipboard",
            Self::LinkCopied => "Share link copied to clipboard",
            Self::Failed => "Copy failed, please copy it manually",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_family() -> FamilyRef {
        FamilyRef::new("SESSION1", "Session Family", "SESSION1")
    }

    #[test]
    fn test_query_takes_priority_over_session() {
        let query = family_from_query([
            ("family_id", "URL00001"),
            ("family_name", "Url Family"),
            ("family_code", "URL00001"),
            ("utm_source", "mail"),
        ]);

        let (family, source) = resolve_family(query, Some(session_family())).unwrap();

        assert_eq!(source, FamilySource::Query);
        assert_eq!(family.family_name, "Url Family");
    }

    #[test]
    fn test_incomplete_query_falls_back_to_session() {
        let query = family_from_query([("family_id", "URL00001")]);
        let (family, source) = resolve_family(query, Some(session_family())).unwrap();

        assert_eq!(source, FamilySource::Session);
        assert_eq!(family, session_family());
    }

    #[test]
    fn test_nothing_complete_is_empty_state() {
        let partial = FamilyRef::new("SESSION1", "", "SESSION1");
        assert_eq!(resolve_family(FamilyRef::default(), Some(partial)), None);
        assert_eq!(resolve_family(FamilyRef::default(), None), None);
    }

    #[test]
    fn test_status_messages() {
        assert!(CopyStatus::Failed.is_error());
        assert!(!CopyStatus::LinkCopied.is_error());
        assert!(CopyStatus::CodeCopied.message().contains("code"));
    }
}
