//! Hand-rendered single-page HTML.
//!
//! The whole UI is one page: upload + query form, analysis sections, chat
//! form, transcript, and a cosmetic logo. Every user-supplied string passes
//! through [`escape`] before it reaches the markup.

use clausewise_core::Speaker;
use uuid::Uuid;

use crate::analyze::AnalysisReport;
use crate::session::Session;

const ABOUT: &str = "ClauseWise is your intelligent legal assistant that simplifies the complex. \
     It analyzes legal documents—like contracts, NDAs, leases, and agreements—using AI to break down \
     dense clauses, highlight key entities, simplify legal jargon, and classify the type of document \
     instantly.";

const DISCLAIMER: &str = "Disclaimer: The information provided by ClauseWise is AI-generated and is \
     for informational purposes only. It does not constitute legal advice. Always consult a licensed \
     attorney.";

const STYLE: &str = "body{background:#1a1a1a;color:#fff;font-family:'Helvetica Neue',sans-serif;\
     max-width:60rem;margin:0 auto;padding:1rem}\
     header{background:#000;padding:1.5rem 2rem;border-radius:10px;display:flex;align-items:center}\
     header img{height:80px;width:80px;margin-right:1rem;border-radius:8px;object-fit:cover}\
     textarea,input[type=file]{width:100%;background:#444654;color:#fff;border:none;\
     border-radius:8px;padding:12px;margin-bottom:1rem}\
     button{background:#000;color:#fff;border:1px solid #555;border-radius:8px;padding:10px 24px}\
     .warning{color:orange}.error{color:#ff6b6b}\
     .disclaimer{color:orange;background:#1f1f1f;padding:1rem;border-radius:8px;margin-top:1rem}\
     footer{text-align:center;color:grey}";

/// HTML-escape a user-supplied string.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page.
pub fn render_page(
    session_id: Uuid,
    session: &Session,
    report: Option<&AnalysisReport>,
    warning: Option<&str>,
) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!doctype html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>ClauseWise</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>");

    // ── Header ──
    html.push_str("<header>");
    if let Some(logo) = &session.logo {
        html.push_str(&format!("<img src=\"{logo}\" alt=\"Logo\">"));
    }
    html.push_str("<h1>ClauseWise: AI Legal Document Analyzer</h1></header>");

    html.push_str(&format!("<h2>About This App</h2><p>{ABOUT}</p>"));

    // ── Document form ──
    html.push_str(&format!(
        "<h2>Upload your document and ask a question</h2>\
         <form action=\"/analyze\" method=\"post\" enctype=\"multipart/form-data\">\
         <input type=\"hidden\" name=\"session\" value=\"{session_id}\">\
         <input type=\"file\" name=\"document\" accept=\".pdf,.docx,.txt\">\
         <textarea name=\"query\" rows=\"4\" \
         placeholder=\"E.g. What clauses limit liability?\"></textarea>\
         <button type=\"submit\">Submit</button></form>"
    ));

    if let Some(warning) = warning {
        html.push_str(&format!("<p class=\"warning\">{}</p>", escape(warning)));
    }
    if let Some(report) = report {
        render_report(&mut html, report);
    }

    // ── Chat ──
    html.push_str(&format!(
        "<h2>Ask Legal Questions (AI-Powered Chat)</h2>\
         <form action=\"/chat\" method=\"post\">\
         <input type=\"hidden\" name=\"session\" value=\"{session_id}\">\
         <textarea name=\"message\" rows=\"3\" \
         placeholder=\"E.g. Is a verbal agreement legally binding?\"></textarea>\
         <button type=\"submit\">Send</button></form>"
    ));

    for message in session.transcript.messages() {
        let label = match message.speaker {
            Speaker::User => "You",
            Speaker::Ai => "ClauseWise AI",
        };
        html.push_str(&format!(
            "<p><strong>{label}:</strong> {}</p>",
            escape(&message.text)
        ));
    }
    if !session.transcript.is_empty() {
        html.push_str(&format!("<div class=\"disclaimer\">{DISCLAIMER}</div>"));
    }

    // ── Logo upload ──
    html.push_str(&format!(
        "<h2>Customize Logo</h2>\
         <form action=\"/logo\" method=\"post\" enctype=\"multipart/form-data\">\
         <input type=\"hidden\" name=\"session\" value=\"{session_id}\">\
         <input type=\"file\" name=\"logo\" accept=\".png,.jpg,.jpeg\">\
         <button type=\"submit\">Upload</button></form>"
    ));

    html.push_str("<footer>© 2025 ClauseWise AI</footer></body></html>");
    html
}

fn render_report(html: &mut String, report: &AnalysisReport) {
    if let Some(query) = &report.query {
        html.push_str(&format!(
            "<h2>Your Query</h2><p>You asked: <em>{}</em></p>",
            escape(query)
        ));
    }
    if let Some(answer) = &report.answer {
        html.push_str(&format!(
            "<h2>AI's Answer</h2><p>{}</p>",
            escape(&answer.text)
        ));
    }

    if let Some(clauses) = &report.clauses {
        html.push_str("<h2>Clause Breakdown</h2>");
        for (i, clause) in clauses.iter().enumerate() {
            html.push_str(&format!(
                "<p><strong>Clause {}:</strong> {}</p>",
                i + 1,
                escape(clause)
            ));
        }
    }

    if let Some(simplified) = &report.simplified {
        html.push_str("<h2>Simplified Clauses</h2>");
        for simple in simplified {
            html.push_str(&format!("<p>{}</p>", escape(simple)));
        }
    }

    if let Some(entities) = &report.entities {
        html.push_str("<h2>Named Entities</h2>");
        for entity in entities {
            html.push_str(&format!(
                "<p>{}: {} ({:.2})</p>",
                escape(&entity.group),
                escape(&entity.text),
                entity.score
            ));
        }
    }

    if let Some(scores) = &report.classification {
        let json = serde_json::to_string_pretty(scores).unwrap_or_else(|_| "[]".into());
        html.push_str(&format!(
            "<h2>Document Type Classification</h2><pre>{}</pre>",
            escape(&json)
        ));
    }

    if let Some(error) = &report.error {
        html.push_str(&format!("<p class=\"error\">{}</p>", escape(error)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_ai::QueryAnswer;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn transcript_and_disclaimer_render_together() {
        let mut session = Session::default();
        session.transcript.push_user("Is it binding?");
        session.transcript.push_ai("legally binding");

        let html = render_page(Uuid::new_v4(), &session, None, None);
        assert!(html.contains("You:"));
        assert!(html.contains("ClauseWise AI:"));
        assert!(html.contains("Disclaimer"));
    }

    #[test]
    fn no_disclaimer_before_first_chat() {
        let html = render_page(Uuid::new_v4(), &Session::default(), None, None);
        assert!(!html.contains("Disclaimer"));
    }

    #[test]
    fn report_error_renders_after_partial_sections() {
        let report = AnalysisReport {
            query: Some("What limits liability?".into()),
            answer: Some(QueryAnswer {
                text: "direct damages only".into(),
                score: 0.9,
            }),
            error: Some("An error occurred: boom".into()),
            ..Default::default()
        };
        let html = render_page(Uuid::new_v4(), &Session::default(), Some(&report), None);
        assert!(html.contains("direct damages only"));
        assert!(html.contains("An error occurred: boom"));
    }

    #[test]
    fn chat_text_is_escaped() {
        let mut session = Session::default();
        session.transcript.push_user("<img onerror=x>");
        let html = render_page(Uuid::new_v4(), &session, None, None);
        assert!(!html.contains("<img onerror"));
        assert!(html.contains("&lt;img onerror"));
    }
}
