pub mod config;
pub mod logger;

pub use config::Config;

use validator::ValidationErrors;

/// Flattens `validator` errors into a single `"msg; msg"` string suitable for
/// surfacing to a caller.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "text cannot be empty"))]
        text: String,
    }

    #[test]
    fn formats_field_messages() {
        let probe = Probe {
            text: String::new(),
        };
        let errs = probe.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errs), "text cannot be empty");
    }
}
