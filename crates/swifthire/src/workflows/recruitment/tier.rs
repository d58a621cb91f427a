use serde::{Deserialize, Serialize};

/// Subscription level gating feature access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PremiumTier {
    #[default]
    Basic,
    Premium,
    Pro,
}

impl PremiumTier {
    pub const fn label(self) -> &'static str {
        match self {
            PremiumTier::Basic => "BASIC",
            PremiumTier::Premium => "PREMIUM",
            PremiumTier::Pro => "PRO",
        }
    }

    /// Lenient parse for stored tier strings. Missing or unknown values degrade to `Basic`.
    pub fn from_label(label: Option<&str>) -> Self {
        Self::parse_paid(label.unwrap_or_default()).unwrap_or(PremiumTier::Basic)
    }

    /// Strict parse for checkout, which only sells the paid tiers.
    pub fn parse_paid(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("PREMIUM") {
            Some(PremiumTier::Premium)
        } else if label.eq_ignore_ascii_case("PRO") {
            Some(PremiumTier::Pro)
        } else {
            None
        }
    }

    pub const fn is_paid(self) -> bool {
        matches!(self, PremiumTier::Premium | PremiumTier::Pro)
    }

    pub const fn entitlements(self) -> Entitlements {
        let paid = self.is_paid();
        Entitlements {
            unlimited_applications: paid,
            unlimited_job_posts: paid,
            candidate_search_filters: paid,
            direct_candidate_contact: paid,
            ai_features: paid,
            featured_listing: paid,
        }
    }

    /// Monthly plan sold by the mock checkout.
    pub const fn plan(self) -> Option<SubscriptionPlan> {
        match self {
            PremiumTier::Basic => None,
            PremiumTier::Premium => Some(SubscriptionPlan {
                tier: PremiumTier::Premium,
                amount_cents: 999,
                description: "SwiftHire Premium Subscription (Monthly)",
            }),
            PremiumTier::Pro => Some(SubscriptionPlan {
                tier: PremiumTier::Pro,
                amount_cents: 4999,
                description: "SwiftHire Pro Subscription (Monthly)",
            }),
        }
    }
}

/// Capability set derived from a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlements {
    pub unlimited_applications: bool,
    pub unlimited_job_posts: bool,
    pub candidate_search_filters: bool,
    pub direct_candidate_contact: bool,
    pub ai_features: bool,
    pub featured_listing: bool,
}

/// Entitlements for a raw tier string as stored on an account.
pub fn entitlements_for(label: Option<&str>) -> Entitlements {
    PremiumTier::from_label(label).entitlements()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionPlan {
    pub tier: PremiumTier,
    pub amount_cents: u32,
    pub description: &'static str,
}

impl SubscriptionPlan {
    pub fn display_amount(&self) -> String {
        format!("{}.{:02}", self.amount_cents / 100, self.amount_cents % 100)
    }
}

/// Numeric caps and thresholds applied by the lifecycle managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowLimits {
    pub basic_job_post_cap: usize,
    pub basic_application_cap: usize,
    pub profile_completion_threshold: u8,
    pub match_profile_minimum: u8,
}

impl Default for WorkflowLimits {
    fn default() -> Self {
        Self {
            basic_job_post_cap: 5,
            basic_application_cap: 10,
            profile_completion_threshold: 70,
            match_profile_minimum: 20,
        }
    }
}

impl WorkflowLimits {
    pub fn job_cap_reached(&self, entitlements: Entitlements, open_postings: usize) -> bool {
        !entitlements.unlimited_job_posts && open_postings >= self.basic_job_post_cap
    }

    pub fn application_cap_reached(&self, entitlements: Entitlements, active: usize) -> bool {
        !entitlements.unlimited_applications && active >= self.basic_application_cap
    }
}
