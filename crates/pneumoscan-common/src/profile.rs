/// Hard-coded profile shown on `/profile`. There is no account backend.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub hospital: String,
    pub last_login: NaiveDateTime,
    pub total_scans: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub date: NaiveDate,
    pub action: String,
    pub patient: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecuritySetting {
    pub title: String,
    pub status: String,
    pub action: String,
}

impl UserProfile {
    pub fn demo() -> Self {
        Self {
            name: "Dr. Sarah Wilson".to_string(),
            email: "sarah.wilson@hospital.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            role: "Senior Radiologist".to_string(),
            hospital: "Central Medical Center".to_string(),
            last_login: NaiveDate::from_ymd_opt(2024, 3, 10)
                .and_then(|d| d.and_hms_opt(14, 30, 0))
                .unwrap_or_default(),
            total_scans: 342,
        }
    }
}

pub fn demo_activity() -> Vec<Activity> {
    let entry = |d, action: &str, patient: Option<&str>| Activity {
        date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default(),
        action: action.to_string(),
        patient: patient.map(str::to_string),
    };
    vec![
        entry(10, "Analyzed chest X-ray", Some("John D.")),
        entry(10, "Updated profile information", None),
        entry(9, "Analyzed chest X-ray", Some("Mary S.")),
        entry(9, "Generated analysis report", Some("James R.")),
    ]
}

pub fn demo_security() -> Vec<SecuritySetting> {
    vec![
        SecuritySetting {
            title: "Password".into(),
            status: "Last changed 3 months ago".into(),
            action: "Change".into(),
        },
        SecuritySetting {
            title: "Two-Factor Authentication".into(),
            status: "Currently enabled".into(),
            action: "Configure".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_profile() {
        let profile = UserProfile::demo();
        assert_eq!(profile.total_scans, 342);
        assert_eq!(profile.last_login.format("%Y-%m-%d %H:%M").to_string(), "2024-03-10 14:30");
    }

    #[test]
    fn test_activity_is_newest_first() {
        let activity = demo_activity();
        assert_eq!(activity.len(), 4);
        assert!(activity.windows(2).all(|w| w[0].date >= w[1].date));
        assert!(activity[1].patient.is_none());
    }
}
