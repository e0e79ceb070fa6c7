//! Required-field validation for page forms.

/// Class added to required fields that were left empty
pub const INVALID_CLASS: &str = "is-invalid";

/// A form control that can be marked valid or invalid
pub trait FormField {
    /// Current value of the control
    fn value(&self) -> String;

    /// Add (`present == true`) or remove a class on the control
    fn toggle_class(&self, class: &str, present: bool);
}

/// A form whose required controls can be enumerated
pub trait Form {
    type Field: FormField;

    /// Every descendant control marked as required, in document order
    fn required_fields(&self) -> Vec<Self::Field>;
}

/// Outcome of validating a single required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Filled,
    Empty,
}

pub fn field_state<F: FormField>(field: &F) -> FieldState {
    if field.value().trim().is_empty() {
        FieldState::Empty
    } else {
        FieldState::Filled
    }
}

/// Mark empty required fields with [`INVALID_CLASS`] and clear the mark on
/// filled ones. Returns true iff every required field is filled.
pub fn validate_form<F: Form>(form: &F) -> bool {
    validate_form_with_class(form, INVALID_CLASS)
}

/// [`validate_form`] using a custom invalid-marker class.
///
/// Every required field is visited, so all empty fields get marked even after
/// the first failure.
pub fn validate_form_with_class<F: Form>(form: &F, invalid_class: &str) -> bool {
    form.required_fields().iter().fold(true, |all_valid, field| {
        let empty = field_state(field) == FieldState::Empty;
        field.toggle_class(invalid_class, empty);
        all_valid && !empty
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockForm;

    #[test]
    fn test_empty_required_field_is_invalid() {
        let form = MockForm::new();
        let name = form.add_required("name", "");

        assert!(!validate_form(&form));
        assert!(name.has_class(INVALID_CLASS));
    }

    #[test]
    fn test_filled_field_clears_marker() {
        let form = MockForm::new();
        let name = form.add_required("name", "");
        assert!(!validate_form(&form));

        name.set_value("Mẫu nước");
        assert!(validate_form(&form));
        assert!(!name.has_class(INVALID_CLASS));
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let form = MockForm::new();
        let code = form.add_required("code", "   \t\n");
        assert!(!validate_form(&form));
        assert!(code.has_class(INVALID_CLASS));
    }

    #[test]
    fn test_every_field_is_marked_on_each_call() {
        let form = MockForm::new();
        let first = form.add_required("first", "");
        let second = form.add_required("second", "ok");
        let third = form.add_required("third", "");
        second.add_class(INVALID_CLASS);

        assert!(!validate_form(&form));
        assert!(first.has_class(INVALID_CLASS));
        assert!(!second.has_class(INVALID_CLASS));
        assert!(third.has_class(INVALID_CLASS));
    }

    #[test]
    fn test_optional_fields_are_ignored() {
        let form = MockForm::new();
        let note = form.add_optional("note", "");
        form.add_required("name", "A");

        assert!(validate_form(&form));
        assert!(!note.has_class(INVALID_CLASS));
    }

    #[test]
    fn test_form_without_required_fields_is_valid() {
        assert!(validate_form(&MockForm::new()));
    }

    #[test]
    fn test_custom_invalid_class() {
        let form = MockForm::new();
        let field = form.add_required("name", "");
        assert!(!validate_form_with_class(&form, "error"));
        assert!(field.has_class("error"));
        assert!(!field.has_class(INVALID_CLASS));
    }
}
