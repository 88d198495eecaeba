use crate::notifications::NotificationCounts;

/// Largest count shown verbatim; anything above renders as `99+`.
pub const BADGE_CEILING: u32 = 99;

/// CSS class marking an element that carries a badge.
pub const HAS_NOTIFICATION_CLASS: &str = "has-notification";

/// Text of the badge for `count`, or `None` when no badge should be shown.
pub fn badge_text(count: u32) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_CEILING => Some(format!("{BADGE_CEILING}+")),
        n => Some(n.to_string()),
    }
}

/// Badges for the three header targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderBadges {
    pub messages: Option<String>,
    pub family: Option<String>,
    /// Aggregate of both counts, shown on the profile button
    pub profile: Option<String>,
}

impl From<NotificationCounts> for HeaderBadges {
    fn from(counts: NotificationCounts) -> Self {
        Self {
            messages: badge_text(counts.unread),
            family: badge_text(counts.new_members),
            profile: badge_text(counts.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(1).as_deref(), Some("1"));
        assert_eq!(badge_text(99).as_deref(), Some("99"));
        assert_eq!(badge_text(100).as_deref(), Some("99+"));
        assert_eq!(badge_text(150).as_deref(), Some("99+"));
    }

    #[test]
    fn test_profile_badge_aggregates() {
        let badges = HeaderBadges::from(NotificationCounts {
            unread: 60,
            new_members: 50,
        });
        assert_eq!(badges.messages.as_deref(), Some("60"));
        assert_eq!(badges.family.as_deref(), Some("50"));
        assert_eq!(badges.profile.as_deref(), Some("99+"));
    }

    #[test]
    fn test_zero_counts_have_no_badges() {
        assert_eq!(HeaderBadges::from(NotificationCounts::default()), HeaderBadges::default());
    }
}
