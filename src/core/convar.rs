//! Console variable implementation.
//!
//! Variables live in one table regardless of their Rust type, so the value is
//! stored as a tagged [`VarValue`] and the declared [`VarType`] is checked on
//! every assignment instead of being recovered through reflection.

use std::fmt::{self, Display};

use super::ConsoleError;

/// The declared type of a console variable.
///
/// Fixed when the variable is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Bool,
    Int,
    Float,
    Str,
}

impl VarType {
    /// Human readable type name used in error lines.
    pub fn name(self) -> &'static str {
        match self {
            VarType::Bool => "boolean",
            VarType::Int => "integer",
            VarType::Float => "float",
            VarType::Str => "string",
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl VarValue {
    /// The type tag of this value.
    pub fn var_type(&self) -> VarType {
        match self {
            VarValue::Bool(_) => VarType::Bool,
            VarValue::Int(_) => VarType::Int,
            VarValue::Float(_) => VarType::Float,
            VarValue::Str(_) => VarType::Str,
        }
    }

    /// Parse raw text into a value of the given type.
    ///
    /// Returns `None` on malformed input; never panics.
    pub fn parse(ty: VarType, text: &str) -> Option<Self> {
        match ty {
            VarType::Bool => {
                if text.eq_ignore_ascii_case("true") {
                    Some(VarValue::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(VarValue::Bool(false))
                } else {
                    None
                }
            }
            VarType::Int => text.parse().ok().map(VarValue::Int),
            VarType::Float => text.parse().ok().map(VarValue::Float),
            VarType::Str => Some(VarValue::Str(text.to_string())),
        }
    }
}

impl Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Bool(v) => write!(f, "{v}"),
            VarValue::Int(v) => write!(f, "{v}"),
            VarValue::Float(v) => write!(f, "{v}"),
            VarValue::Str(v) => f.write_str(v),
        }
    }
}

/// Rust types that can be stored in a console variable.
///
/// Implemented for `bool`, `i32`, `f32` and `String`.
pub trait ConVarValue: Clone + Send + Sync + 'static {
    /// The declared type this Rust type maps to.
    const TYPE: VarType;

    /// Wrap into the tagged value.
    fn into_value(self) -> VarValue;

    /// Unwrap from the tagged value, `None` if the tag differs.
    fn from_value(value: &VarValue) -> Option<Self>;
}

impl ConVarValue for bool {
    const TYPE: VarType = VarType::Bool;

    fn into_value(self) -> VarValue {
        VarValue::Bool(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConVarValue for i32 {
    const TYPE: VarType = VarType::Int;

    fn into_value(self) -> VarValue {
        VarValue::Int(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConVarValue for f32 {
    const TYPE: VarType = VarType::Float;

    fn into_value(self) -> VarValue {
        VarValue::Float(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConVarValue for String {
    const TYPE: VarType = VarType::Str;

    fn into_value(self) -> VarValue {
        VarValue::Str(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// A console variable: current value, default value and a fixed type.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{ConVar, VarValue};
///
/// let mut number = ConVar::new("Number", 123i32, 456);
/// assert!(number.set(VarValue::Int(789)).is_ok());
/// assert!(number.set(VarValue::Bool(true)).is_err());
/// assert_eq!(number.get(), &VarValue::Int(789));
/// assert_eq!(number.default_value(), &VarValue::Int(456));
/// ```
#[derive(Debug, Clone)]
pub struct ConVar {
    name: Box<str>,
    value: VarValue,
    default: VarValue,
    var_type: VarType,
}

impl ConVar {
    /// Create a new variable. The type is taken from `T`.
    pub fn new<T: ConVarValue>(name: impl Into<Box<str>>, value: T, default: T) -> Self {
        Self {
            name: name.into(),
            value: value.into_value(),
            default: default.into_value(),
            var_type: T::TYPE,
        }
    }

    /// Get the name as registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared type.
    #[inline]
    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Get the current value.
    #[inline]
    pub fn get(&self) -> &VarValue {
        &self.value
    }

    /// Get the default value.
    #[inline]
    pub fn default_value(&self) -> &VarValue {
        &self.default
    }

    /// Set the current value. The value is left unchanged on a type mismatch.
    pub fn set(&mut self, value: VarValue) -> Result<(), ConsoleError> {
        self.check_type(&value)?;
        self.value = value;
        Ok(())
    }

    /// Set the default value. The default is left unchanged on a type mismatch.
    pub fn set_default(&mut self, value: VarValue) -> Result<(), ConsoleError> {
        self.check_type(&value)?;
        self.default = value;
        Ok(())
    }

    /// Parse `text` into the declared type and assign it.
    pub fn set_from_str(&mut self, text: &str) -> Result<(), ConsoleError> {
        let value = VarValue::parse(self.var_type, text).ok_or_else(|| {
            ConsoleError::ConversionError {
                name: self.name.to_string(),
                input: text.to_string(),
                target: self.var_type,
            }
        })?;
        self.value = value;
        Ok(())
    }

    /// Restore the default value.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    /// Check if the current value differs from default.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.value != self.default
    }

    fn check_type(&self, value: &VarValue) -> Result<(), ConsoleError> {
        if value.var_type() == self.var_type {
            Ok(())
        } else {
            Err(ConsoleError::TypeMismatch {
                name: self.name.to_string(),
                expected: self.var_type,
                found: value.var_type(),
            })
        }
    }
}

impl ConVar {
    /// The query line for this variable, headed by `name` as the user typed it.
    pub fn describe(&self, name: &str) -> String {
        format!("\"{name}\" is: \"{}\" Default: \"{}\"", self.value, self.default)
    }
}

impl Display for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convar_basic() {
        let cvar = ConVar::new("Number", 123i32, 456);
        assert_eq!(cvar.name(), "Number");
        assert_eq!(cvar.var_type(), VarType::Int);
        assert_eq!(cvar.get(), &VarValue::Int(123));
        assert_eq!(cvar.default_value(), &VarValue::Int(456));
    }

    #[test]
    fn test_convar_type_mismatch_keeps_value() {
        let mut cvar = ConVar::new("Number", 123i32, 456);

        let err = cvar.set(VarValue::Str("789".into())).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::TypeMismatch { expected: VarType::Int, found: VarType::Str, .. }
        ));
        assert_eq!(cvar.get(), &VarValue::Int(123));

        assert!(cvar.set_default(VarValue::Bool(false)).is_err());
        assert_eq!(cvar.default_value(), &VarValue::Int(456));
    }

    #[test]
    fn test_convar_set_from_str() {
        let mut cvar = ConVar::new("Number", 123i32, 456);
        cvar.set_from_str("789").unwrap();
        assert_eq!(cvar.get(), &VarValue::Int(789));

        let err = cvar.set_from_str("abc").unwrap_err();
        assert!(matches!(err, ConsoleError::ConversionError { target: VarType::Int, .. }));
        assert_eq!(cvar.get(), &VarValue::Int(789));
    }

    #[test]
    fn test_convar_bool_parse() {
        assert_eq!(VarValue::parse(VarType::Bool, "true"), Some(VarValue::Bool(true)));
        assert_eq!(VarValue::parse(VarType::Bool, "FALSE"), Some(VarValue::Bool(false)));
        assert_eq!(VarValue::parse(VarType::Bool, "1"), None);
        assert_eq!(VarValue::parse(VarType::Float, "0.5"), Some(VarValue::Float(0.5)));
        assert_eq!(VarValue::parse(VarType::Int, "2147483648"), None);
    }

    #[test]
    fn test_convar_reset() {
        let mut cvar = ConVar::new("String", "John".to_string(), "Empty".to_string());
        assert!(cvar.is_modified());

        cvar.reset();
        assert_eq!(cvar.get(), &VarValue::Str("Empty".into()));
        assert!(!cvar.is_modified());
    }

    #[test]
    fn test_convar_display() {
        let cvar = ConVar::new("Boolean", true, false);
        assert_eq!(cvar.to_string(), "\"Boolean\" is: \"true\" Default: \"false\"");
        assert_eq!(cvar.describe("BOOLEAN"), "\"BOOLEAN\" is: \"true\" Default: \"false\"");
    }

    #[test]
    fn test_typed_roundtrip() {
        assert_eq!(i32::from_value(&VarValue::Int(7)), Some(7));
        assert_eq!(i32::from_value(&VarValue::Bool(true)), None);
        assert_eq!(String::from_value(&"x".to_string().into_value()), Some("x".to_string()));
    }
}
