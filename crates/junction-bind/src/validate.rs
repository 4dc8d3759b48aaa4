//! Post-bind validation.
//!
//! A record opts in by implementing [`Validate`]. Each [`Check`] names the
//! fields it is about by reference, so the binder can render `{0}`, `{1}`...
//! placeholders with the tag values of those fields:
//!
//! ```rust
//! use junction_bind::{Bind, Check, Validate};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize, Bind)]
//! struct Signup {
//!     #[bind(json)]
//!     name: String,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self) -> Vec<Check> {
//!         vec![Check::new(self.name.len() > 6, "{0} too short").target(&self.name)]
//!     }
//! }
//! ```
//!
//! A check target must reference a field of the value being validated. A
//! target pointing anywhere else is a programmer error and panics with a
//! [`ProgrammerError`] payload.
//!
//! Implementing [`ValidateOwned`] instead, which consumes a copy of the
//! record, cannot be linked back to the bound fields. The binder logs a
//! warning once per type and skips validation.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use junction_core::ProgrammerError;
use parking_lot::Mutex;

use crate::field::{locate, span, FieldAddr, FieldSpec};

/// Condition name carried by the panic for an unmappable check target.
pub const VALIDATOR_MISUSE: &str = "validator misuse";

/// Validation over a bound value, by reference.
pub trait Validate {
    /// Returns every check, passing or not, in a stable order.
    fn validate(&self) -> Vec<Check>;
}

/// Validation that consumes the value. Detected but never run by the binder.
pub trait ValidateOwned {
    /// Returns every check.
    fn validate(self) -> Vec<Check>;
}

/// One field-level validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    valid: bool,
    template: Cow<'static, str>,
    targets: Vec<(usize, usize)>,
}

impl Check {
    /// Creates a check. `template` may reference targets as `{0}`, `{1}`...
    pub fn new(valid: bool, template: impl Into<Cow<'static, str>>) -> Self {
        Self {
            valid,
            template: template.into(),
            targets: Vec::new(),
        }
    }

    /// Adds a target field.
    #[must_use]
    pub fn target<F: ?Sized>(mut self, field: &F) -> Self {
        self.targets.push(span(field));
        self
    }

    /// Whether the check passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The message template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// A rendered violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Message with placeholders substituted.
    pub message: String,
    /// Rust names of the target fields, in target order.
    pub fields: Vec<&'static str>,
}

/// All violations of one bind, in the order the record reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// The violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Rendered messages.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are none.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// What a bound type offers for validation.
#[derive(Debug)]
pub enum Capability {
    /// [`Validate`] is implemented; these are its checks.
    Addressable(Vec<Check>),
    /// Only [`ValidateOwned`] is implemented.
    ValueOnly,
    /// No validation.
    Absent,
}

/// Autoref probes used by the derive to pick the most specific capability.
///
/// `(&&&Probe(value)).capability()` resolves to [`AddressableProbe`] when
/// the type implements [`Validate`], else [`OwnedProbe`] when it implements
/// [`ValidateOwned`], else [`AbsentProbe`].
pub mod probe {
    use super::{Capability, Validate, ValidateOwned};

    /// Wraps the value under inspection.
    pub struct Probe<'a, T>(pub &'a T);

    /// Selected for [`Validate`] types.
    pub trait AddressableProbe {
        /// Runs the checks.
        fn capability(&self) -> Capability;
    }

    impl<T: Validate> AddressableProbe for &&Probe<'_, T> {
        fn capability(&self) -> Capability {
            Capability::Addressable(self.0.validate())
        }
    }

    /// Selected for [`ValidateOwned`] types.
    pub trait OwnedProbe {
        /// Reports the value-only capability.
        fn capability(&self) -> Capability;
    }

    impl<T: ValidateOwned> OwnedProbe for &Probe<'_, T> {
        fn capability(&self) -> Capability {
            Capability::ValueOnly
        }
    }

    /// Fallback for everything else.
    pub trait AbsentProbe {
        /// Reports no capability.
        fn capability(&self) -> Capability;
    }

    impl<T> AbsentProbe for Probe<'_, T> {
        fn capability(&self) -> Capability {
            Capability::Absent
        }
    }
}

static WARNED: Mutex<BTreeSet<&'static str>> = parking_lot::const_mutex(BTreeSet::new());

/// Logs the value-receiver warning for `type_name` the first time only.
/// Returns true when the warning was emitted.
pub(crate) fn warn_value_only(type_name: &'static str) -> bool {
    let first = WARNED.lock().insert(type_name);
    if first {
        tracing::warn!(
            target_type = type_name,
            "validation skipped: type implements ValidateOwned, which cannot reference the bound fields; implement Validate instead"
        );
    }
    first
}

/// Folds checks into violations, mapping each target to its field label.
///
/// # Panics
///
/// Panics with a [`ProgrammerError`] when a failing check targets memory
/// outside the bound value's fields.
pub(crate) fn fold(
    type_name: &'static str,
    checks: Vec<Check>,
    specs: &'static [FieldSpec],
    addrs: &[FieldAddr],
) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    for check in checks.into_iter().filter(|c| !c.valid) {
        let mut message = check.template.into_owned();
        let mut fields = Vec::with_capacity(check.targets.len());

        for (i, (addr, size)) in check.targets.iter().copied().enumerate() {
            let Some(spec) = locate(addrs, addr, size).and_then(|index| specs.get(index)) else {
                ProgrammerError::new(
                    VALIDATOR_MISUSE,
                    format!(
                        "{type_name}: check \"{message}\" target {i} is not a field of the bound value"
                    ),
                )
                .raise();
            };
            message = message.replace(&format!("{{{i}}}"), spec.label());
            fields.push(spec.name);
        }

        violations.push(Violation { message, fields });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::probe::{AbsentProbe as _, AddressableProbe as _, OwnedProbe as _, Probe};
    use super::*;
    use crate::source::Tag;

    struct Account {
        name: String,
        age: u8,
    }

    static SPECS: &[FieldSpec] = &[
        FieldSpec {
            name: "name",
            tags: &[(Tag::Json, "name")],
        },
        FieldSpec {
            name: "age",
            tags: &[],
        },
    ];

    fn addrs(account: &Account) -> Vec<FieldAddr> {
        vec![FieldAddr::of(&account.name, 0), FieldAddr::of(&account.age, 1)]
    }

    impl Validate for Account {
        fn validate(&self) -> Vec<Check> {
            vec![
                Check::new(self.name.len() > 6, "{0} too short").target(&self.name),
                Check::new(self.age >= 18, "{0} must be at least 18").target(&self.age),
                Check::new(!self.name.is_empty(), "{0} is required").target(&self.name),
            ]
        }
    }

    struct Snapshot;

    impl ValidateOwned for Snapshot {
        fn validate(self) -> Vec<Check> {
            Vec::new()
        }
    }

    struct Plain;

    #[test]
    fn test_fold_renders_labels_in_order() {
        let account = Account {
            name: "abc".into(),
            age: 9,
        };
        let err = fold("Account", account.validate(), SPECS, &addrs(&account)).unwrap_err();

        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string(), "name too short; age must be at least 18");
        assert_eq!(err.violations()[1].fields, ["age"]);
    }

    #[test]
    fn test_fold_all_valid() {
        let account = Account {
            name: "abcdefgh".into(),
            age: 30,
        };
        fold("Account", account.validate(), SPECS, &addrs(&account)).unwrap();
    }

    #[test]
    fn test_fold_multiple_targets() {
        let account = Account {
            name: String::new(),
            age: 1,
        };
        let check = Check::new(false, "{1} and {0} conflict")
            .target(&account.name)
            .target(&account.age);
        let err = fold("Account", vec![check], SPECS, &addrs(&account)).unwrap_err();
        assert_eq!(err.to_string(), "age and name conflict");
    }

    #[test]
    fn test_fold_ignores_valid_foreign_targets() {
        let account = Account {
            name: String::new(),
            age: 1,
        };
        let elsewhere = 0_u8;
        let check = Check::new(true, "{0}").target(&elsewhere);
        fold("Account", vec![check], SPECS, &addrs(&account)).unwrap();
    }

    #[test]
    fn test_fold_foreign_target_panics() {
        let account = Account {
            name: String::new(),
            age: 1,
        };
        let elsewhere = 0_u8;
        let table = addrs(&account);
        let payload = std::panic::catch_unwind(|| {
            let check = Check::new(false, "{0} bad").target(&elsewhere);
            let _ = fold("Account", vec![check], SPECS, &table);
        })
        .unwrap_err();

        let err = payload.downcast_ref::<ProgrammerError>().unwrap();
        assert_eq!(err.condition, VALIDATOR_MISUSE);
        assert!(err.detail.starts_with("Account:"));
    }

    #[test]
    fn test_probe_selection() {
        let account = Account {
            name: "abcdefgh".into(),
            age: 30,
        };
        assert!(matches!(
            (&&&Probe(&account)).capability(),
            Capability::Addressable(checks) if checks.len() == 3
        ));
        assert!(matches!(
            (&&&Probe(&Snapshot)).capability(),
            Capability::ValueOnly
        ));
        assert!(matches!((&&&Probe(&Plain)).capability(), Capability::Absent));
    }

    #[test]
    fn test_value_only_warning_once() {
        struct WarnedOnce;
        let name = std::any::type_name::<WarnedOnce>();
        assert!(warn_value_only(name));
        assert!(!warn_value_only(name));
    }

    #[test]
    fn test_check_accessors() {
        let check = Check::new(false, String::from("{0} bad"));
        assert!(!check.is_valid());
        assert_eq!(check.template(), "{0} bad");
    }
}
