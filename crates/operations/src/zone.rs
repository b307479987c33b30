use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::ZoneId;

use crate::{GeoPoint, RiskLevel};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Safe,
    Moderate,
    Unsafe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub status: ZoneStatus,
    pub risk_level: RiskLevel,
    /// 0.0 – 10.0
    pub risk_score: f64,
    pub incident_count: u32,
    pub polygon: Vec<GeoPoint>,
    pub last_update: DateTime<Utc>,
}

impl Zone {
    pub fn heatmap_view(&self) -> HeatmapZone {
        HeatmapZone {
            id: self.id.clone(),
            name: self.name.clone(),
            coordinates: self.polygon.clone(),
            risk_level: self.risk_level,
            incident_count: self.incident_count,
            color: self.risk_level.color().to_string(),
        }
    }
}

/// What the risk heatmap draws for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapZone {
    pub id: ZoneId,
    pub name: String,
    pub coordinates: Vec<GeoPoint>,
    pub risk_level: RiskLevel,
    pub incident_count: u32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneFilter {
    pub status: Option<ZoneStatus>,
    pub min_risk: Option<RiskLevel>,
}

impl ZoneFilter {
    pub fn status(status: ZoneStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn at_least(risk: RiskLevel) -> Self {
        Self {
            min_risk: Some(risk),
            ..Self::default()
        }
    }

    pub fn matches(&self, zone: &Zone) -> bool {
        self.status.is_none_or(|s| s == zone.status)
            && self.min_risk.is_none_or(|r| zone.risk_level >= r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(status: ZoneStatus, risk_level: RiskLevel) -> Zone {
        Zone {
            id: ZoneId::new("zone-2"),
            name: "India Gate".to_string(),
            status,
            risk_level,
            risk_score: 5.2,
            incident_count: 7,
            polygon: vec![GeoPoint::new(28.6129, 77.2295)],
            last_update: Utc::now(),
        }
    }

    #[test]
    fn heatmap_colour_follows_risk_level() {
        let view = zone(ZoneStatus::Moderate, RiskLevel::Medium).heatmap_view();
        assert_eq!(view.color, "#f59e0b");
        assert_eq!(view.incident_count, 7);
    }

    #[test]
    fn min_risk_filter_is_inclusive() {
        let z = zone(ZoneStatus::Moderate, RiskLevel::Medium);
        assert!(ZoneFilter::at_least(RiskLevel::Medium).matches(&z));
        assert!(!ZoneFilter::at_least(RiskLevel::High).matches(&z));
        assert!(!ZoneFilter::status(ZoneStatus::Safe).matches(&z));
    }
}
