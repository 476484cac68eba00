//! Form fields.
//!
//! Every field is a labelled control whose `name` matches the backend field
//! it feeds, so submitted forms can be forwarded as-is.

use crate::ui::{escape, flag};

/// Text-like `<input>` (text, email, password, number, date, ...).
#[derive(Debug, Clone)]
pub struct Input<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
    pub required: bool,
    pub placeholder: &'a str,
}

impl<'a> Input<'a> {
    pub fn text(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            kind: "text",
            value,
            required: false,
            placeholder: "",
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: &'a str) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn render(&self) -> String {
        let step = if self.kind == "number" { r#" step="any""# } else { "" };
        format!(
            r#"<label class="field"><span>{label}{star}</span><input type="{kind}" name="{name}" value="{value}" placeholder="{placeholder}"{step} {required}></label>"#,
            label = escape(self.label),
            star = if self.required { " *" } else { "" },
            kind = self.kind,
            name = self.name,
            value = escape(self.value),
            placeholder = escape(self.placeholder),
            required = flag("required", self.required),
        )
    }
}

pub fn textarea(name: &str, label: &str, value: &str, rows: u32, required: bool) -> String {
    format!(
        r#"<label class="field"><span>{label}{star}</span><textarea name="{name}" rows="{rows}" {required}>{value}</textarea></label>"#,
        label = escape(label),
        star = if required { " *" } else { "" },
        value = escape(value),
        required = flag("required", required),
    )
}

/// `<select>`; `options` are `(value, label)` pairs.
pub fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            format!(
                r#"<option value="{}" {}>{}</option>"#,
                escape(value),
                flag("selected", value == selected),
                escape(text)
            )
        })
        .collect();
    format!(
        r#"<label class="field"><span>{}</span><select name="{name}">{options}</select></label>"#,
        escape(label)
    )
}

/// Checkbox posting `true` when ticked. Unticked boxes are absent from the
/// submission, which the backend reads as false on a full update.
pub fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label class="field checkbox"><input type="checkbox" name="{name}" value="true" {}><span>{}</span></label>"#,
        flag("checked", checked),
        escape(label)
    )
}

pub fn file(name: &str, label: &str, multiple: bool, accept: &str) -> String {
    format!(
        r#"<label class="field"><span>{}</span><input type="file" name="{name}" accept="{accept}" {}></label>"#,
        escape(label),
        flag("multiple", multiple)
    )
}

/// `<form>` wrapper; multipart when it carries files.
pub fn form(action: &str, multipart: bool, fields: &[String], submit_label: &str) -> String {
    let enctype = if multipart {
        r#" enctype="multipart/form-data""#
    } else {
        ""
    };
    format!(
        r#"<form method="post" action="{action}"{enctype} class="form">{fields}<div class="form-actions"><button type="submit" class="btn btn-primary">{label}</button></div></form>"#,
        action = escape(action),
        fields = fields.concat(),
        label = escape(submit_label),
    )
}

/// Options for a status-like enum: `(as_str, label)`.
pub fn options<'a, I>(values: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    values
        .into_iter()
        .map(|(value, label)| (value.to_string(), label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_escapes_value() {
        let html = Input::text("name", "Name", r#"Bob "the" Builder"#)
            .required()
            .render();
        assert!(html.contains(r#"value="Bob &quot;the&quot; Builder""#));
        assert!(html.contains("required"));
    }

    #[test]
    fn select_marks_current() {
        let html = select(
            "status",
            "Status",
            &[("pending".into(), "Pending".into()), ("confirmed".into(), "Confirmed".into())],
            "confirmed",
        );
        assert!(html.contains(r#"<option value="confirmed" selected>"#));
        assert!(html.contains(r#"<option value="pending" >"#));
    }

    #[test]
    fn file_forms_are_multipart() {
        let html = form("/x", true, &[file("image", "Image", false, "image/*")], "Save");
        assert!(html.contains(r#"enctype="multipart/form-data""#));
    }
}
