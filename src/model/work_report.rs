use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Field-service visit report filed by a technician. Free-form apart from
/// the visit date and customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 4,
    "date": "2025-10-06",
    "customerName": "Harbour Logistics",
    "location": "Dock 4",
    "purpose": "Maintenance",
    "inTime": "10:15",
    "outTime": "12:40",
    "issue": "Conveyor stalls under load",
    "machineSystem": "Conveyor C2",
    "reportedBy": "Shift lead",
    "actionTaken": "Replaced drive belt",
    "status": "Completed",
    "task": null,
    "actionRequired": null,
    "remark": null,
    "partNumber": "DB-220",
    "serialNumber": "C2-0193",
    "qty": 1,
    "additionalNote": null,
    "preparedBy": "Amara Okafor",
    "submittedTo": "Operations"
}))]
pub struct WorkReport {
    pub id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub customer_name: String,
    pub location: Option<String>,
    pub purpose: Option<String>,
    #[schema(value_type = Option<String>, example = "10:15")]
    #[serde(default, with = "clock")]
    pub in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "12:40")]
    #[serde(default, with = "clock")]
    pub out_time: Option<NaiveTime>,
    pub issue: Option<String>,
    pub machine_system: Option<String>,
    pub reported_by: Option<String>,
    pub action_taken: Option<String>,
    pub status: Option<String>,
    pub task: Option<String>,
    pub action_required: Option<String>,
    pub remark: Option<String>,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub qty: Option<u32>,
    pub additional_note: Option<String>,
    pub prepared_by: Option<String>,
    pub submitted_to: Option<String>,
}

/// Everything but the id; what the store inserts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewWorkReport {
    pub date: NaiveDate,
    pub customer_name: String,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub in_time: Option<NaiveTime>,
    pub out_time: Option<NaiveTime>,
    pub issue: Option<String>,
    pub machine_system: Option<String>,
    pub reported_by: Option<String>,
    pub action_taken: Option<String>,
    pub status: Option<String>,
    pub task: Option<String>,
    pub action_required: Option<String>,
    pub remark: Option<String>,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub qty: Option<u32>,
    pub additional_note: Option<String>,
    pub prepared_by: Option<String>,
    pub submitted_to: Option<String>,
}

impl NewWorkReport {
    pub fn into_report(self, id: u64) -> WorkReport {
        WorkReport {
            id,
            date: self.date,
            customer_name: self.customer_name,
            location: self.location,
            purpose: self.purpose,
            in_time: self.in_time,
            out_time: self.out_time,
            issue: self.issue,
            machine_system: self.machine_system,
            reported_by: self.reported_by,
            action_taken: self.action_taken,
            status: self.status,
            task: self.task,
            action_required: self.action_required,
            remark: self.remark,
            part_number: self.part_number,
            serial_number: self.serial_number,
            qty: self.qty,
            additional_note: self.additional_note,
            prepared_by: self.prepared_by,
            submitted_to: self.submitted_to,
        }
    }
}

/// `HH:MM` on the wire.
pub(crate) mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
