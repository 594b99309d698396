//! Vehicle details, MOT tests, and defects.

// self
use crate::_prelude::*;

/// Vehicle details and MOT history returned by registration and VIN lookups.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleDetails {
	/// Registration mark.
	pub registration: String,
	/// Vehicle identification number.
	pub vin: String,
	/// Manufacturer.
	pub make: String,
	/// Model name.
	pub model: String,
	/// Date the vehicle was first used.
	pub first_used_date: String,
	/// Fuel type.
	pub fuel_type: String,
	/// Primary colour.
	pub primary_colour: String,
	/// Date the vehicle was first registered.
	pub registration_date: String,
	/// Date the vehicle was manufactured.
	pub manufacture_date: String,
	/// Engine size in cubic centimetres.
	pub engine_size: String,
	/// Outstanding safety recall status (`Yes`, `No`, `Unknown`, `Unavailable`).
	pub has_outstanding_recall: String,
	/// MOT tests, most recent first.
	pub mot_tests: Vec<MotTest>,
}
impl VehicleDetails {
	/// Returns the most recent MOT test, if any.
	pub fn latest_test(&self) -> Option<&MotTest> {
		self.mot_tests.first()
	}
}

/// A single MOT test.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotTest {
	/// Completion timestamp.
	pub completed_date: String,
	/// Test result (`PASSED` or `FAILED`).
	pub test_result: String,
	/// Certificate expiry date; empty for failed tests.
	pub expiry_date: String,
	/// Recorded odometer reading.
	pub odometer_value: String,
	/// Odometer unit (`MI` or `KM`).
	pub odometer_unit: String,
	/// How the odometer reading was obtained.
	pub odometer_result_type: String,
	/// MOT test number.
	pub mot_test_number: String,
	/// Source system of the record.
	pub data_source: String,
	/// Testing station location, when recorded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	/// Defects found during the test, when recorded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub defects: Option<Vec<Defect>>,
}
impl MotTest {
	/// Returns `true` if any recorded defect is flagged as dangerous.
	pub fn has_dangerous_defects(&self) -> bool {
		self.defects.iter().flatten().any(|defect| defect.dangerous)
	}
}

/// A defect recorded during an MOT test.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defect {
	/// Defect description.
	pub text: String,
	/// Defect category (`ADVISORY`, `MINOR`, `MAJOR`, `DANGEROUS`, …).
	#[serde(rename = "type")]
	pub kind: String,
	/// Whether the defect was marked dangerous.
	pub dangerous: bool,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const FULL_VEHICLE: &str = r#"{
		"registration": "ML58FOU",
		"make": "NISSAN",
		"model": "SKYLINE",
		"firstUsedDate": "1990-01-01",
		"fuelType": "Petrol",
		"primaryColour": "Grey",
		"registrationDate": "2008-09-01",
		"manufactureDate": "1990-01-01",
		"engineSize": "2568",
		"hasOutstandingRecall": "Unknown",
		"motTests": [
			{
				"completedDate": "2023-03-01T10:00:00.000Z",
				"testResult": "FAILED",
				"expiryDate": "",
				"odometerValue": "120000",
				"odometerUnit": "KM",
				"odometerResultType": "READ",
				"motTestNumber": "123456789012",
				"dataSource": "DVSA",
				"location": "Leeds",
				"defects": [
					{ "text": "Brake pipe corroded", "type": "DANGEROUS", "dangerous": true },
					{ "text": "Tyre worn close to limit", "type": "ADVISORY", "dangerous": false }
				]
			},
			{
				"completedDate": "2022-03-01T10:00:00.000Z",
				"testResult": "PASSED",
				"expiryDate": "2023-03-01",
				"odometerValue": "110000",
				"odometerUnit": "KM",
				"odometerResultType": "READ",
				"motTestNumber": "123456789011",
				"dataSource": "DVSA"
			}
		]
	}"#;

	#[test]
	fn decodes_full_vehicle_payload() {
		let vehicle: VehicleDetails =
			serde_json::from_str(FULL_VEHICLE).expect("Full vehicle payload should decode.");
		let latest = vehicle.latest_test().expect("Vehicle should carry MOT tests.");

		assert_eq!(vehicle.registration, "ML58FOU");
		assert_eq!(vehicle.engine_size, "2568");
		assert_eq!(vehicle.mot_tests.len(), 2);
		assert_eq!(latest.location.as_deref(), Some("Leeds"));
		assert!(latest.has_dangerous_defects());
		assert_eq!(
			latest.defects.as_ref().map(|defects| defects[1].kind.as_str()),
			Some("ADVISORY")
		);
		assert_eq!(vehicle.mot_tests[1].location, None);
		assert_eq!(vehicle.mot_tests[1].defects, None);
		assert!(!vehicle.mot_tests[1].has_dangerous_defects());
	}

	#[test]
	fn absent_optional_fields_are_not_serialized() {
		let test = MotTest { test_result: "PASSED".into(), ..Default::default() };
		let encoded = serde_json::to_value(&test).expect("MOT test should serialize.");

		assert_eq!(encoded["testResult"], "PASSED");
		assert!(encoded.get("location").is_none());
		assert!(encoded.get("defects").is_none());
	}

	#[test]
	fn populated_vehicle_survives_encode_then_decode() {
		let original = VehicleDetails {
			registration: "ML58FOU".into(),
			vin: "BNR32305366".into(),
			make: "NISSAN".into(),
			model: "SKYLINE".into(),
			first_used_date: "1990-01-01".into(),
			fuel_type: "Petrol".into(),
			primary_colour: "Grey".into(),
			registration_date: "2008-09-01".into(),
			manufacture_date: "1990-01-01".into(),
			engine_size: "2568".into(),
			has_outstanding_recall: "Unknown".into(),
			mot_tests: vec![
				MotTest {
					completed_date: "2023-03-01T10:00:00.000Z".into(),
					test_result: "FAILED".into(),
					odometer_value: "120000".into(),
					odometer_unit: "KM".into(),
					odometer_result_type: "READ".into(),
					mot_test_number: "123456789012".into(),
					data_source: "DVSA".into(),
					location: Some(String::new()),
					defects: Some(Vec::new()),
					..Default::default()
				},
				MotTest {
					completed_date: "2022-03-01T10:00:00.000Z".into(),
					test_result: "PASSED".into(),
					expiry_date: "2023-03-01".into(),
					location: None,
					defects: None,
					..Default::default()
				},
				MotTest {
					test_result: "FAILED".into(),
					location: Some("Leeds".into()),
					defects: Some(vec![Defect {
						text: "Brake pipe corroded".into(),
						kind: "DANGEROUS".into(),
						dangerous: true,
					}]),
					..Default::default()
				},
			],
		};
		let encoded = serde_json::to_string(&original).expect("Vehicle should serialize.");
		let decoded: VehicleDetails =
			serde_json::from_str(&encoded).expect("Serialized vehicle should decode.");

		assert_eq!(decoded, original);
		assert_eq!(decoded.mot_tests[0].location.as_deref(), Some(""));
		assert_eq!(decoded.mot_tests[0].defects.as_deref(), Some(&[][..]));
		assert_eq!(decoded.mot_tests[1].location, None);
		assert_eq!(decoded.mot_tests[1].defects, None);
	}

	#[test]
	fn partial_payload_defaults_missing_fields() {
		let vehicle: VehicleDetails = serde_json::from_str(r#"{"vin":"BNR32305366"}"#)
			.expect("Partial vehicle payload should decode.");

		assert_eq!(vehicle.vin, "BNR32305366");
		assert!(vehicle.registration.is_empty());
		assert!(vehicle.mot_tests.is_empty());
	}
}
