//! Email templates for donor notifications

use bloodlink_core::RequestSnapshot;

/// Subject line for a donor notification
pub fn render_subject(blood_group: &str, org_name: &str) -> String {
    format!(
        "Urgent Blood Request: {} Needed - {}",
        blood_group, org_name
    )
}

/// Render the HTML body for a donor notification
pub fn render_html_body(donor_name: &str, request: &RequestSnapshot, org_name: &str) -> String {
    let donor_name = display_donor_name(donor_name);
    let patient_name = display_patient_name(&request.patient_name);
    let hospital = hospital_info(request);
    let urgency = urgency_label(request.urgency.as_deref());

    let mut html = format!(
        "<p>Dear {donor_name},</p>\
         <p>An urgent blood request has been posted that matches your blood group \
         (<strong>{group}</strong>) for patient '{patient_name}'.</p>\
         <p><strong>Hospital:</strong> {hospital}</p>\
         <p><strong>Units Required:</strong> {units}</p>\
         <p><strong>Urgency:</strong> {urgency}</p>\
         <p><strong>Contact Person for Request:</strong> {contact} ({number})</p>",
        group = request.required_blood_group.trim(),
        units = request.units_required,
        contact = request.contact_person,
        number = request.contact_number,
    );

    if let Some(info) = present(&request.additional_info) {
        html.push_str(&format!("<p>Additional Information: {}</p>", info));
    }

    html.push_str(
        "<p>If you are available and able to help, please consider responding. \
         Your donation can save a life.</p>",
    );
    html.push_str(&format!(
        "<p>Thank you for being a part of the {} community.</p>",
        org_name
    ));
    html.push_str(&format!(
        "<p><em>Note: To manage your donor profile or availability, please visit the {} app.</em></p>",
        org_name
    ));

    html
}

/// Render the plain-text body for a donor notification
pub fn render_text_body(donor_name: &str, request: &RequestSnapshot, org_name: &str) -> String {
    let donor_name = display_donor_name(donor_name);
    let patient_name = display_patient_name(&request.patient_name);
    let hospital = hospital_info(request);
    let urgency = urgency_label(request.urgency.as_deref());

    let mut text = format!(
        "Dear {donor_name},\n\
         An urgent blood request has been posted that matches your blood group \
         ({group}) for patient '{patient_name}'.\n\
         Hospital: {hospital}\n\
         Units Required: {units}\n\
         Urgency: {urgency}\n\
         Contact Person for Request: {contact} ({number})\n",
        group = request.required_blood_group.trim(),
        units = request.units_required,
        contact = request.contact_person,
        number = request.contact_number,
    );

    if let Some(info) = present(&request.additional_info) {
        text.push_str(&format!("Additional Information: {}\n", info));
    }

    text.push_str(
        "If you are available and able to help, please consider responding. \
         Your donation can save a life.\n",
    );
    text.push_str(&format!(
        "Thank you for being a part of the {} community.\n",
        org_name
    ));
    text.push_str(&format!(
        "Note: To manage your donor profile or availability, please visit the {} app.\n",
        org_name
    ));

    text
}

fn display_donor_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "Donor"
    } else {
        trimmed
    }
}

fn display_patient_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "a patient"
    } else {
        trimmed
    }
}

/// Hospital name plus optional location in parentheses
fn hospital_info(request: &RequestSnapshot) -> String {
    match present(&request.hospital_location) {
        Some(location) => format!("{} ({})", request.hospital_name, location),
        None => request.hospital_name.clone(),
    }
}

/// Capitalized urgency label, "N/A" when absent
fn urgency_label(urgency: Option<&str>) -> String {
    match urgency.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let mut chars = raw.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => "N/A".to_string(),
            }
        }
        None => "N/A".to_string(),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn snapshot() -> RequestSnapshot {
        RequestSnapshot {
            id: Uuid::new_v4(),
            patient_name: "Jane Smith".to_string(),
            required_blood_group: "O-".to_string(),
            units_required: 2,
            hospital_name: "University Hospital".to_string(),
            hospital_location: Some("North Campus".to_string()),
            urgency: Some("urgent".to_string()),
            contact_person: "John Roe".to_string(),
            contact_number: "555-0100".to_string(),
            additional_info: Some("Needed before Friday".to_string()),
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_subject_contains_group_and_org() {
        let subject = render_subject("O-", "BloodLink");
        assert_eq!(subject, "Urgent Blood Request: O- Needed - BloodLink");
    }

    #[test]
    fn test_both_bodies_contain_all_fields() {
        let request = snapshot();
        for body in [
            render_html_body("Alex Donor", &request, "BloodLink"),
            render_text_body("Alex Donor", &request, "BloodLink"),
        ] {
            assert!(body.contains("Alex Donor"));
            assert!(body.contains("Jane Smith"));
            assert!(body.contains("O-"));
            assert!(body.contains("University Hospital (North Campus)"));
            assert!(body.contains('2'));
            assert!(body.contains("Urgent"));
            assert!(body.contains("John Roe"));
            assert!(body.contains("555-0100"));
            assert!(body.contains("Needed before Friday"));
            assert!(body.contains("BloodLink"));
        }
    }

    #[test]
    fn test_donor_and_patient_fallbacks() {
        let mut request = snapshot();
        request.patient_name = "  ".to_string();
        let text = render_text_body("", &request, "BloodLink");
        assert!(text.starts_with("Dear Donor,"));
        assert!(text.contains("for patient 'a patient'"));
    }

    #[test]
    fn test_urgency_fallback_and_capitalization() {
        let mut request = snapshot();
        request.urgency = None;
        assert!(render_text_body("A", &request, "X").contains("Urgency: N/A"));

        request.urgency = Some("moderate".to_string());
        assert!(render_text_body("A", &request, "X").contains("Urgency: Moderate"));
    }

    #[test]
    fn test_missing_location_and_additional_info() {
        let mut request = snapshot();
        request.hospital_location = None;
        request.additional_info = None;
        let html = render_html_body("A", &request, "X");
        assert!(html.contains("University Hospital</p>"));
        assert!(!html.contains("University Hospital ("));
        assert!(!html.contains("Additional Information"));
    }
}
