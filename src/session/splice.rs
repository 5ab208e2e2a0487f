/// Append `suggestion` to `document` as a new word followed by one space.
///
/// A separating space is inserted unless the document is empty or already
/// ends with one. There is no cursor: the suggestion always goes at the end.
pub fn splice(document: &str, suggestion: &str) -> String {
    let spacer = if document.is_empty() || document.ends_with(' ') {
        ""
    } else {
        " "
    };
    let mut out = String::with_capacity(document.len() + spacer.len() + suggestion.len() + 1);
    out.push_str(document);
    out.push_str(spacer);
    out.push_str(suggestion);
    out.push(' ');
    out
}
