use super::*;

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            api_url: crate::pricing::NordPoolClient::DEFAULT_BASE_URL.to_string(),
            energy_unit: EnergyUnit::Kilo,
            currency_unit: CurrencyUnit::Cents,
            timeout_secs: 10,
        }
    }
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            base_url: crate::device::CloudDeviceController::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            json_format: false,
            console_output: true,
            file: None,
            backup_count: 5,
        }
    }
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            username: "NordPoolLightsMiAccountUsername".to_string(),
            password: "NordPoolLightsMiAccountPassword".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: None,
            pricing: PricingSettings::default(),
            cloud: CloudSettings::default(),
            logging: LoggingConfig::default(),
            parameters: ParameterNames::default(),
        }
    }
}
