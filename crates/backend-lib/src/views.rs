//! Minimal HTML for the login flow; page templating lives outside this crate.
use std::fmt::Write as _;

/// Escape text for an HTML text node or quoted attribute
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn login_page(error: Option<&str>) -> String {
    let mut page = String::from(
        "<!doctype html>\n<html><head><title>Sign in</title></head><body>\n<h1>Sign in</h1>\n",
    );
    if let Some(error) = error {
        let _ = writeln!(page, "<p class=\"error\">{}</p>", escape(error));
    }
    page.push_str(concat!(
        "<form method=\"post\" action=\"/login\">\n",
        "<label>Username <input type=\"text\" name=\"username\" autocomplete=\"username\" required></label>\n",
        "<label>Password <input type=\"password\" name=\"pwd\" autocomplete=\"current-password\" required></label>\n",
        "<label><input type=\"checkbox\" name=\"persist\"> Remember me</label>\n",
        "<button type=\"submit\">Sign in</button>\n",
        "</form>\n</body></html>\n",
    ));
    page
}

pub fn index_page(subject: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><title>Boathouse</title></head><body>\n\
         <p>Signed in as {}</p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n\
         </body></html>\n",
        escape(subject)
    )
}
