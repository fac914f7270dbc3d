use serde::{Deserialize, Serialize};

use crate::trip::{validate_charge, ValidationError};

pub const DEFAULT_USER_ID: &str = "default_user";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_owned()
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub vehicle_model: String,
    /// kWh
    pub battery_capacity: i32,
    /// Percent
    pub current_charge: i32,
}

impl VehicleProfile {
    /// What a user gets before saving anything.
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            vehicle_model: "Model 3 Long Range".into(),
            battery_capacity: 82,
            current_charge: 80,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_charge(self.current_charge)?;

        if self.battery_capacity <= 0 {
            return Err(ValidationError::BatteryCapacity(self.battery_capacity));
        }
        if self.vehicle_model.trim().is_empty() {
            return Err(ValidationError::EmptyVehicleModel);
        }

        Ok(())
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self::default_for(DEFAULT_USER_ID)
    }
}

#[test]
fn test_user_id_defaults_when_missing() {
    let profile: VehicleProfile =
        serde_json::from_str(r#"{"vehicleModel": "Model Y", "batteryCapacity": 75, "currentCharge": 55}"#).unwrap();
    assert_eq!(profile.user_id, DEFAULT_USER_ID);
    assert_eq!(profile.validate(), Ok(()));
}

#[test]
fn test_default_profile() {
    let profile = VehicleProfile::default();
    assert_eq!(profile.vehicle_model, "Model 3 Long Range");
    assert_eq!(profile.battery_capacity, 82);
    assert_eq!(profile.current_charge, 80);
}

#[test]
fn test_validate_profile() {
    let mut profile = VehicleProfile::default();
    profile.battery_capacity = 0;
    assert_eq!(profile.validate(), Err(ValidationError::BatteryCapacity(0)));

    let mut profile = VehicleProfile::default();
    profile.current_charge = 120;
    assert_eq!(profile.validate(), Err(ValidationError::Charge(120)));
}
