use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when rendering a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Required fields missing or empty: {0}")]
    ValidationFailed(#[from] validator::ValidationErrors),
}

/// Field map for a bail application
///
/// Every field is required except `grounds_for_bail`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BailApplicationFields {
    #[validate(length(min = 1))]
    pub court_name: String,
    #[validate(length(min = 1))]
    pub case_no: String,
    #[validate(length(min = 1))]
    pub defendant_name: String,
    #[validate(length(min = 1))]
    pub defendant_age: String,
    #[validate(length(min = 1))]
    pub defendant_father_name: String,
    #[validate(length(min = 1))]
    pub defendant_address: String,
    #[validate(length(min = 1))]
    pub fir_no: String,
    #[validate(length(min = 1))]
    pub police_station: String,
    #[validate(length(min = 1))]
    pub offences: String,
    #[validate(length(min = 1))]
    pub surety_name: String,
    #[validate(length(min = 1))]
    pub surety_address: String,
    #[validate(length(min = 1))]
    pub surety_relationship: String,
    #[serde(default)]
    pub grounds_for_bail: String,
}

/// Render a bail application from a fully-populated field map
///
/// Rejects the request when any required field is empty; the optional
/// grounds field defaults to "N/A".
pub fn render_bail_application(fields: &BailApplicationFields) -> Result<String, DocumentError> {
    fields.validate()?;

    let grounds = if fields.grounds_for_bail.trim().is_empty() {
        "N/A"
    } else {
        fields.grounds_for_bail.trim()
    };

    let body = format!(
        "BAIL APPLICATION\n\
         Under Section 437 of the Code of Criminal Procedure, 1973\n\
         \n\
         IN THE COURT OF {court}\n\
         Case No.: {case_no}\n\
         \n\
         Applicant/Defendant:\n\
         {defendant}, Age: {age}, S/o {father}, residing at {address}.\n\
         \n\
         Versus\n\
         \n\
         The State\n\
         Through {police_station} Police Station\n\
         \n\
         Subject: Application for bail in FIR No. {fir_no}, under sections {offences}.\n\
         \n\
         May it please Your Honour,\n\
         \n\
         The Applicant/Defendant named above respectfully submits as under:\n\
         \n\
         1. That the applicant has been falsely implicated in the above-noted case and is innocent.\n\
         2. That the investigation in the case is complete and the applicant is no longer required \
         for custodial interrogation.\n\
         3. That the applicant has permanent roots in society and there is no chance of them \
         absconding from the course of justice.\n\
         4. Additional grounds: {grounds}\n\
         \n\
         PRAYER:\n\
         It is, therefore, most respectfully prayed that this Hon'ble Court may be pleased to grant \
         bail to the applicant/defendant in the interest of justice. The applicant is ready to \
         furnish a reliable surety of {surety}, residing at {surety_address} ({surety_relationship}) \
         and undertakes to abide by any conditions imposed by this Hon'ble Court.\n\
         \n\
         Applicant/Defendant                                    Through Counsel\n\
         ({defendant})\n",
        court = fields.court_name.to_uppercase(),
        case_no = fields.case_no,
        defendant = fields.defendant_name,
        age = fields.defendant_age,
        father = fields.defendant_father_name,
        address = fields.defendant_address,
        police_station = fields.police_station,
        fir_no = fields.fir_no,
        offences = fields.offences,
        grounds = grounds,
        surety = fields.surety_name,
        surety_address = fields.surety_address,
        surety_relationship = fields.surety_relationship,
    );

    Ok(body)
}
