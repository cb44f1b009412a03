//! Pure passcode-resolution rules.
//!
//! 不包含 IO / async；控制器根据这里的结论产生动作。

use crate::commissioning::{Passcode, NO_PASSCODE};
use crate::declaration::CommissionerDeclaration;
use crate::session::{PeerSession, TargetAppCheckState, TargetAppInfo, TargetAppList};

/// Outcome of recording one target-app check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCheckDecision {
    /// An earlier check already returned a passcode; nothing was recorded.
    AlreadyResolved,

    /// First passcode wins: hand off now.
    Commission { passcode: Passcode },

    /// Other target apps have not answered yet.
    AwaitPending,

    /// Every target app answered without a passcode.
    /// `apps_found == false` means none of them is installed.
    Advance { apps_found: bool },
}

/// Records `target`'s check outcome in `apps` and decides the next step.
///
/// Only entries still `NotInitialized` with the same vendor/product id are
/// updated. A non-zero `passcode` marks the entry `AppFoundPasscodeReturned`
/// so that later checks become no-ops.
pub fn apply_target_check(
    apps: &mut TargetAppList,
    target: &TargetAppInfo,
    passcode: Passcode,
) -> TargetCheckDecision {
    if apps
        .iter()
        .any(|info| info.check_state == TargetAppCheckState::AppFoundPasscodeReturned)
    {
        return TargetCheckDecision::AlreadyResolved;
    }

    let recorded_state = if passcode != NO_PASSCODE {
        TargetAppCheckState::AppFoundPasscodeReturned
    } else {
        target.check_state
    };

    let mut apps_found = false;
    let mut pending = false;
    let mut updates = Vec::new();
    for (index, info) in apps.iter().enumerate() {
        let state = info.check_state;
        if state.is_pending() && info.matches(target) {
            updates.push(index);
            apps_found |= recorded_state.is_found();
        } else if state.is_pending() {
            pending = true;
        } else {
            apps_found |= state.is_found();
        }
    }
    for index in updates {
        // indices come from the same list
        let _ = apps.set_check_state(index, recorded_state);
    }

    if passcode != NO_PASSCODE {
        TargetCheckDecision::Commission { passcode }
    } else if pending {
        TargetCheckDecision::AwaitPending
    } else {
        TargetCheckDecision::Advance { apps_found }
    }
}

/// Next step of the generic passcode fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeStep {
    Commission { passcode: Passcode },

    /// Ask the passcode service for a commissioner-generated passcode.
    GenerateCommissionerPasscode,

    /// Ask the operator to enter the peer's passcode, optionally telling the
    /// peer first.
    PromptForPasscode {
        declaration: Option<CommissionerDeclaration>,
    },
}

/// Picks the fallback step, rules applied in order.
pub fn plan_resume(
    session: &PeerSession,
    passcode: Passcode,
    passcode_service_configured: bool,
) -> ResumeStep {
    if passcode != NO_PASSCODE {
        return ResumeStep::Commission { passcode };
    }

    let flags = session.flags();
    let cd = session.accepts_declarations();
    if passcode_service_configured && flags.commissioner_passcode && cd {
        return ResumeStep::GenerateCommissionerPasscode;
    }

    let declaration = if flags.no_passcode && cd {
        Some(CommissionerDeclaration::needs_passcode())
    } else if flags.cd_upon_passcode_dialog && cd {
        Some(CommissionerDeclaration::passcode_dialog_displayed())
    } else {
        None
    };
    ResumeStep::PromptForPasscode { declaration }
}
