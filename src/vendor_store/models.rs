use chrono::NaiveDate;

/// Date written for report rows whose expiry date is missing.
pub const MISSING_EXPIRY_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(date) => date,
    None => panic!("invalid sentinel date"),
};

/// A vendor document row returned by the alert query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRecord {
    pub vendor_name: String,
    pub document_number: String,
    pub expiry_date: NaiveDate,
    pub email: String,
}

impl VendorRecord {
    /// Returns a copy with every text field trimmed, or `None` if any of them
    /// is blank after trimming.
    pub fn trimmed(&self) -> Option<VendorRecord> {
        let vendor_name = self.vendor_name.trim();
        let document_number = self.document_number.trim();
        let email = self.email.trim();

        if vendor_name.is_empty() || document_number.is_empty() || email.is_empty() {
            return None;
        }

        Some(VendorRecord {
            vendor_name: vendor_name.to_string(),
            document_number: document_number.to_string(),
            expiry_date: self.expiry_date,
            email: email.to_string(),
        })
    }
}

/// A vendor document row returned by the report query.
///
/// Text fields are kept as stored; a missing expiry date is replaced by
/// [`MISSING_EXPIRY_DATE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub vendor_name: String,
    pub document_number: String,
    pub expiry_date: NaiveDate,
    pub email: String,
}
