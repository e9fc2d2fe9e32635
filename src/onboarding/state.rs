/// Why the onboarding flow is leaving the waiting screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The profile became visible.
    ProfileFound,
    /// The user chose to continue before the profile was seen.
    ManualOverride,
    /// There is no authenticated identity to wait for.
    NoIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    Checking,
    Redirecting(RedirectReason),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingEvent {
    ProfileFound,
    ManualOverride,
    ErrorObserved,
    NoIdentity,
    Navigated,
}

impl OnboardingState {
    /// Applies `event`, or returns `None` when the event has no meaning in
    /// this state.
    pub fn next(self, event: OnboardingEvent) -> Option<Self> {
        use OnboardingEvent as E;

        match (self, event) {
            (Self::Checking, E::ProfileFound) => {
                Some(Self::Redirecting(RedirectReason::ProfileFound))
            }
            (Self::Checking, E::ManualOverride) => {
                Some(Self::Redirecting(RedirectReason::ManualOverride))
            }
            (Self::Checking, E::NoIdentity) => Some(Self::Redirecting(RedirectReason::NoIdentity)),
            (Self::Checking, E::ErrorObserved) => Some(Self::Checking),
            (Self::Redirecting(_), E::Navigated) => Some(Self::Done),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
