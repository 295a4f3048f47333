//! Output file naming for generated artifacts.

use crate::types::Type;
use heck::ToKebabCase;

/// Directory used for types declared without a package.
pub const DEFAULT_PACKAGE: &str = "_default";

/// `Outer.InnerThing2` → `outer-inner-thing-2`.
pub fn file_name_for_type(t: &Type) -> String {
    split_digits(&t.nested_name().to_kebab_case())
}

/// Separate runs of digits from adjacent letters: `message1` → `message-1`.
fn split_digits(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len() + 4);
    let mut prev: Option<char> = None;
    for c in kebab.chars() {
        if let Some(p) = prev {
            if (p.is_ascii_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_ascii_alphabetic())
            {
                out.push('-');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// `<package>/<file name>`, with [`DEFAULT_PACKAGE`] standing in for the empty package.
pub fn file_path_for_type(t: &Type) -> String {
    let package = match t.package() {
        "" => DEFAULT_PACKAGE,
        p => p,
    };
    format!("{package}/{}", file_name_for_type(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EnumDescriptorProto;
    use crate::enums::Enum;
    use crate::types::Identity;

    fn enum_type(package: &str, name: &str, parent: Option<&Identity>) -> Type {
        let e = EnumDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        };
        Type::Enum(Enum::build(package, &e, parent))
    }

    #[test]
    fn nested_names_are_kebab_cased() {
        let outer = Identity::new("acme.v1", "TopMessage", None);
        let t = enum_type("acme.v1", "InnerKind", Some(&outer));
        assert_eq!(file_name_for_type(&t), "top-message-inner-kind");
        assert_eq!(file_path_for_type(&t), "acme.v1/top-message-inner-kind");
    }

    #[test]
    fn digits_start_their_own_word() {
        let outer = Identity::new("acme.v1", "TopMessage", None);
        let inner = Identity::new("acme.v1", "InnerMessage1", Some(&outer));
        let t = enum_type("acme.v1", "V2Kind", Some(&inner));
        assert_eq!(file_name_for_type(&t), "top-message-inner-message-1-v-2-kind");
    }

    #[test]
    fn empty_package_uses_default_directory() {
        let t = enum_type("", "Status", None);
        assert_eq!(file_path_for_type(&t), "_default/status");
    }
}
