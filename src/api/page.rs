//! HTML rendering for the calculator form.

use std::fmt::Write as _;

use crate::error::EngineError;
use crate::format::DisplayValues;
use crate::models::FilingStatus;

use super::form::WithholdingForm;

/// Everything needed to render the calculator page.
#[derive(Debug)]
pub struct FormPage<'a> {
    /// Tax year shown in the title and posted back with the form.
    pub tax_year: i32,
    /// Values to pre-fill the inputs with.
    pub form: &'a WithholdingForm,
    /// Formatted result of a successful calculation.
    pub display: Option<&'a DisplayValues>,
    /// Error from a rejected submission.
    pub error: Option<&'a EngineError>,
}

impl<'a> FormPage<'a> {
    /// An empty form for `tax_year`.
    pub fn blank(tax_year: i32, form: &'a WithholdingForm) -> Self {
        Self {
            tax_year,
            form,
            display: None,
            error: None,
        }
    }

    fn invalid_field(&self) -> Option<&str> {
        match self.error {
            Some(EngineError::InvalidInput { field, .. }) => Some(field.as_str()),
            _ => None,
        }
    }
}

const AMOUNT_FIELDS: [(&str, &str); 4] = [
    ("gross_annual_salary", "Annual Salary ($)"),
    ("step3_credit", "Dependents Credit (Step 3)"),
    ("step4a_other_income", "Other Income (Step 4a)"),
    ("step4b_deductions", "Deductions (Step 4b)"),
];

const STYLE: &str = "body{font-family:sans-serif;max-width:42rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.75rem}\
input,select{width:100%;padding:.3rem}\
.invalid{border:2px solid #c00}\
.error{color:#c00}\
.metrics{display:grid;grid-template-columns:1fr 1fr;gap:.5rem 1.5rem;margin-top:1.5rem}\
.metric span{display:block;font-size:.85rem;color:#555}\
.metric strong{font-size:1.3rem}\
.disclaimer{margin-top:2rem;font-size:.8rem;color:#555}";

/// Renders the calculator page.
pub fn render_form_page(page: &FormPage<'_>) -> String {
    let title = format!("IRS 15-T Withholding Calculator ({})", page.tax_year);
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    if let Some(error) = page.error {
        let _ = writeln!(
            html,
            "<p class=\"error\" role=\"alert\">{}</p>",
            escape_html(&error.to_string())
        );
    }

    let _ = writeln!(html, "<form method=\"post\" action=\"/\">");
    let _ = writeln!(
        html,
        "<input type=\"hidden\" name=\"tax_year\" value=\"{}\">",
        page.tax_year
    );

    let invalid = page.invalid_field();
    for (index, (name, label)) in AMOUNT_FIELDS.iter().enumerate() {
        let value = match *name {
            "gross_annual_salary" => &page.form.gross_annual_salary,
            "step3_credit" => &page.form.step3_credit,
            "step4a_other_income" => &page.form.step4a_other_income,
            _ => &page.form.step4b_deductions,
        };
        html.push_str(&amount_input(name, label, value, invalid == Some(*name)));

        // Filing status sits directly under the salary.
        if index == 0 {
            html.push_str(&status_select(
                &page.form.filing_status,
                invalid == Some("filing_status"),
            ));
        }
    }

    html.push_str("<p><button type=\"submit\">Calculate</button></p>\n</form>\n");

    if let Some(display) = page.display {
        html.push_str(&metrics(display));
    }

    html.push_str(
        "<p class=\"disclaimer\">Estimates only, using the Publication 15-T percentage \
         method for annual payroll. This is not tax advice.</p>\n</body>\n</html>\n",
    );
    html
}

fn amount_input(name: &str, label: &str, value: &str, invalid: bool) -> String {
    let class = if invalid {
        " class=\"invalid\" aria-invalid=\"true\""
    } else {
        ""
    };
    format!(
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"1000\" value=\"{}\"{class}>\n",
        escape_html(value)
    )
}

fn status_select(current: &str, invalid: bool) -> String {
    let selected_status = current.parse::<FilingStatus>().unwrap_or(FilingStatus::Single);
    let class = if invalid {
        " class=\"invalid\" aria-invalid=\"true\""
    } else {
        ""
    };

    let mut select = format!(
        "<label for=\"filing_status\">Filing Status (W-4 Step 1)</label>\n\
         <select id=\"filing_status\" name=\"filing_status\"{class}>\n"
    );
    for status in FilingStatus::ALL {
        let selected = if status == selected_status { " selected" } else { "" };
        let _ = writeln!(
            select,
            "<option value=\"{}\"{selected}>{}</option>",
            status.as_str(),
            status.label()
        );
    }
    select.push_str("</select>\n");
    select
}

fn metrics(display: &DisplayValues) -> String {
    let rows = [
        ("Federal Income Tax", &display.federal_tax),
        ("Social Security Tax", &display.social_security_tax),
        ("Medicare Tax", &display.medicare_tax),
        ("Total Tax", &display.total_tax),
        ("Net Annual Income", &display.net_income),
        ("Effective Withholding Rate", &display.effective_rate),
    ];

    let mut section = String::from("<section class=\"metrics\">\n");
    for (label, value) in rows {
        let _ = writeln!(
            section,
            "<div class=\"metric\"><span>{label}</span><strong>{}</strong></div>",
            escape_html(value)
        );
    }
    section.push_str("</section>\n");
    section
}

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">'x' & y</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&#x27;x&#x27; &amp; y&lt;&#x2f;b&gt;"
        );
    }

    #[test]
    fn test_blank_page_has_inputs_and_no_metrics() {
        let form = WithholdingForm::default();
        let html = render_form_page(&FormPage::blank(2024, &form));

        assert!(html.contains("<title>IRS 15-T Withholding Calculator (2024)</title>"));
        assert!(html.contains("name=\"gross_annual_salary\" min=\"0\""));
        assert!(html.contains("name=\"step4b_deductions\" min=\"0\""));
        assert!(html.contains("<option value=\"single\" selected>Single</option>"));
        assert!(html.contains("Head of Household"));
        assert!(!html.contains("class=\"metrics\""));
        assert!(html.contains("not tax advice"));
    }

    #[test]
    fn test_page_with_results_shows_all_metrics() {
        let form = WithholdingForm {
            gross_annual_salary: "100000".to_string(),
            filing_status: "married_filing_jointly".to_string(),
            ..WithholdingForm::default()
        };
        let display = DisplayValues {
            federal_tax: "$12,615".to_string(),
            social_security_tax: "$6,200".to_string(),
            medicare_tax: "$1,450".to_string(),
            total_tax: "$20,265".to_string(),
            net_income: "$79,735".to_string(),
            effective_rate: "20.26%".to_string(),
        };
        let page = FormPage {
            display: Some(&display),
            ..FormPage::blank(2024, &form)
        };
        let html = render_form_page(&page);

        assert!(html.contains("value=\"100000\""));
        assert!(html.contains("<option value=\"married_filing_jointly\" selected>"));
        for value in ["$12,615", "$6,200", "$1,450", "$20,265", "$79,735", "20.26%"] {
            assert!(html.contains(value), "missing {}", value);
        }
    }

    #[test]
    fn test_invalid_field_is_highlighted_and_echoed_safely() {
        let form = WithholdingForm {
            gross_annual_salary: "<script>".to_string(),
            filing_status: "single".to_string(),
            ..WithholdingForm::default()
        };
        let error = EngineError::invalid_input("gross_annual_salary", "'<script>' is not a number");
        let page = FormPage {
            error: Some(&error),
            ..FormPage::blank(2024, &form)
        };
        let html = render_form_page(&page);

        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&lt;script&gt;\" class=\"invalid\""));
        assert!(html.contains("role=\"alert\""));
    }
}
