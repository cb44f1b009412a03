use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commissioning::{ProductId, VendorId};

/// Maximum number of target apps a single request may list.
pub const MAX_TARGET_APP_INFOS: usize = 10;

/// Outcome of checking one target app for a passcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetAppCheckState {
    /// No answer yet.
    #[default]
    NotInitialized,
    AppFoundPasscodeReturned,
    AppFoundNoPasscode,
    AppNotFound,
}

impl TargetAppCheckState {
    /// True for every outcome that confirms the app is installed.
    pub fn is_found(self) -> bool {
        matches!(
            self,
            TargetAppCheckState::AppFoundPasscodeReturned | TargetAppCheckState::AppFoundNoPasscode
        )
    }

    pub fn is_pending(self) -> bool {
        matches!(self, TargetAppCheckState::NotInitialized)
    }
}

/// One companion app candidate plus its check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetAppInfo {
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    #[serde(default)]
    pub check_state: TargetAppCheckState,
}

impl TargetAppInfo {
    pub fn new(vendor_id: VendorId, product_id: ProductId) -> Self {
        Self {
            vendor_id,
            product_id,
            check_state: TargetAppCheckState::NotInitialized,
        }
    }

    pub fn with_check_state(mut self, check_state: TargetAppCheckState) -> Self {
        self.check_state = check_state;
        self
    }

    /// Same vendor/product identity, regardless of check state.
    pub fn matches(&self, other: &TargetAppInfo) -> bool {
        self.vendor_id == other.vendor_id && self.product_id == other.product_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TargetAppListError {
    #[error("target app list is full (capacity {capacity})")]
    Full { capacity: usize },

    #[error("target app index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered, fixed-capacity list of target apps owned by a peer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TargetAppInfo>", into = "Vec<TargetAppInfo>")]
pub struct TargetAppList(Vec<TargetAppInfo>);

impl TargetAppList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, info: TargetAppInfo) -> Result<(), TargetAppListError> {
        if self.0.len() >= MAX_TARGET_APP_INFOS {
            return Err(TargetAppListError::Full {
                capacity: MAX_TARGET_APP_INFOS,
            });
        }
        self.0.push(info);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&TargetAppInfo> {
        self.0.get(index)
    }

    pub fn set_check_state(
        &mut self,
        index: usize,
        state: TargetAppCheckState,
    ) -> Result<(), TargetAppListError> {
        let len = self.0.len();
        let entry = self
            .0
            .get_mut(index)
            .ok_or(TargetAppListError::IndexOutOfRange { index, len })?;
        entry.check_state = state;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetAppInfo> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<TargetAppInfo>> for TargetAppList {
    type Error = TargetAppListError;

    fn try_from(items: Vec<TargetAppInfo>) -> Result<Self, Self::Error> {
        let mut list = TargetAppList::new();
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }
}

impl From<TargetAppList> for Vec<TargetAppInfo> {
    fn from(list: TargetAppList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a TargetAppList {
    type Item = &'a TargetAppInfo;
    type IntoIter = std::slice::Iter<'a, TargetAppInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_eleventh_entry() {
        let mut list = TargetAppList::new();
        for i in 0..MAX_TARGET_APP_INFOS {
            list.push(TargetAppInfo::new(0xFFF1, i as u16)).unwrap();
        }
        assert_eq!(
            list.push(TargetAppInfo::new(0xFFF1, 99)),
            Err(TargetAppListError::Full { capacity: 10 })
        );
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn set_check_state_updates_by_index() {
        let mut list = TargetAppList::new();
        list.push(TargetAppInfo::new(1, 2)).unwrap();
        list.set_check_state(0, TargetAppCheckState::AppNotFound)
            .unwrap();
        assert_eq!(
            list.get(0).map(|i| i.check_state),
            Some(TargetAppCheckState::AppNotFound)
        );
        assert_eq!(
            list.set_check_state(3, TargetAppCheckState::AppNotFound),
            Err(TargetAppListError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn matches_ignores_check_state() {
        let a = TargetAppInfo::new(1, 2);
        let b = a.with_check_state(TargetAppCheckState::AppFoundNoPasscode);
        assert!(a.matches(&b));
        assert!(!a.matches(&TargetAppInfo::new(1, 3)));
    }

    #[test]
    fn found_and_pending_classification() {
        assert!(TargetAppCheckState::AppFoundNoPasscode.is_found());
        assert!(TargetAppCheckState::AppFoundPasscodeReturned.is_found());
        assert!(!TargetAppCheckState::AppNotFound.is_found());
        assert!(TargetAppCheckState::NotInitialized.is_pending());
    }
}
