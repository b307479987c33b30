//! Demo records served by the simulated backend.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use portal_core::{AlertId, AuditId, CallId, DigitalId, IncidentId, ZoneId};
use portal_operations::{
    Alert, AlertKind, AuditEntry, AuditStatus, CallStatus, DigitalIdentity, GeoPoint, Incident, IncidentKind,
    IncidentStatus, OperatorCall, Priority, RiskLevel, VerificationStatus, Zone, ZoneStatus,
};

/// The mutable world of the simulated backend.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub incidents: Vec<Incident>,
    pub zones: Vec<Zone>,
    pub digital_identities: Vec<DigitalIdentity>,
    pub calls: Vec<OperatorCall>,
    pub audit_entries: Vec<AuditEntry>,
    pub alerts: Vec<Alert>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn polygon(points: &[(f64, f64)]) -> Vec<GeoPoint> {
    points.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect()
}

impl Fixtures {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records relative to `now`, so "15 minutes ago" stays 15 minutes ago.
    pub fn demo(now: DateTime<Utc>) -> Self {
        let ago = |minutes: i64| now - Duration::minutes(minutes);

        let incidents = vec![
            Incident {
                id: IncidentId::new("INC-2024-001"),
                title: "Tourist Harassment at Red Fort".into(),
                description: "Foreign tourist reports harassment by local vendors. Immediate assistance requested."
                    .into(),
                kind: IncidentKind::Harassment,
                priority: Priority::High,
                status: IncidentStatus::Dispatched,
                location: "Red Fort, Delhi".into(),
                coordinates: GeoPoint::new(28.6562, 77.2410),
                reported_by: "Tourist (DID-12345)".into(),
                reported_at: ago(15),
                assigned_to: Some("Officer Sarah Chen".into()),
                assigned_at: Some(ago(12)),
                digital_id: Some(DigitalId::new("DID-12345")),
                estimated_response: Some("8 minutes".into()),
            },
            Incident {
                id: IncidentId::new("INC-2024-002"),
                title: "Pickpocket Incident - Connaught Place".into(),
                description: "Wallet stolen from tourist near Metro Station. CCTV footage available.".into(),
                kind: IncidentKind::Theft,
                priority: Priority::Medium,
                status: IncidentStatus::Acknowledged,
                location: "Connaught Place Metro Station".into(),
                coordinates: GeoPoint::new(28.6328, 77.2197),
                reported_by: "Hotel Staff".into(),
                reported_at: ago(45),
                assigned_to: None,
                assigned_at: None,
                digital_id: Some(DigitalId::new("DID-67890")),
                estimated_response: None,
            },
            Incident {
                id: IncidentId::new("INC-2024-003"),
                title: "Medical Emergency - India Gate".into(),
                description: "Tourist collapsed near India Gate. Ambulance requested.".into(),
                kind: IncidentKind::Emergency,
                priority: Priority::High,
                status: IncidentStatus::Resolved,
                location: "India Gate".into(),
                coordinates: GeoPoint::new(28.6129, 77.2295),
                reported_by: "112 Emergency".into(),
                reported_at: ago(120),
                assigned_to: Some("Paramedic Unit 7".into()),
                assigned_at: Some(ago(115)),
                digital_id: None,
                estimated_response: None,
            },
            Incident {
                id: IncidentId::new("INC-2024-004"),
                title: "Fraudulent Tour Guide".into(),
                description: "Reports of unlicensed guide charging excessive fees to tourists.".into(),
                kind: IncidentKind::Fraud,
                priority: Priority::Medium,
                status: IncidentStatus::Reported,
                location: "Chandni Chowk".into(),
                coordinates: GeoPoint::new(28.6506, 77.2334),
                reported_by: "Tourist Complaint".into(),
                reported_at: ago(90),
                assigned_to: None,
                assigned_at: None,
                digital_id: None,
                estimated_response: None,
            },
        ];

        let zones = vec![
            Zone {
                id: ZoneId::new("zone-1"),
                name: "Connaught Place".into(),
                status: ZoneStatus::Unsafe,
                risk_level: RiskLevel::High,
                risk_score: 8.5,
                incident_count: 12,
                polygon: polygon(&[(28.6328, 77.2197), (28.6340, 77.2210), (28.6320, 77.2220), (28.6308, 77.2207)]),
                last_update: ago(10),
            },
            Zone {
                id: ZoneId::new("zone-2"),
                name: "India Gate".into(),
                status: ZoneStatus::Moderate,
                risk_level: RiskLevel::Medium,
                risk_score: 5.2,
                incident_count: 7,
                polygon: polygon(&[(28.6129, 77.2295), (28.6140, 77.2310), (28.6120, 77.2320), (28.6108, 77.2305)]),
                last_update: ago(20),
            },
            Zone {
                id: ZoneId::new("zone-3"),
                name: "Red Fort".into(),
                status: ZoneStatus::Safe,
                risk_level: RiskLevel::Low,
                risk_score: 2.1,
                incident_count: 3,
                polygon: polygon(&[(28.6562, 77.2410), (28.6580, 77.2430), (28.6560, 77.2440), (28.6542, 77.2420)]),
                last_update: ago(45),
            },
        ];

        let digital_identities = vec![
            DigitalIdentity {
                digital_id: DigitalId::new("DID-12345"),
                name: "John Smith".into(),
                nationality: "USA".into(),
                status: VerificationStatus::Verified,
                visa_type: "Tourist Visa".into(),
                issue_date: date(2024, 1, 15),
                expiry_date: date(2024, 12, 15),
                last_seen: ago(30),
                location: "Red Fort, Delhi".into(),
                verification_count: 12,
                blockchain_tx: "0x7a9f3c2e8b1d".into(),
                consent_scope: vec!["location".into(), "emergency_contact".into()],
                flag_reason: None,
                pending_reason: None,
                last_verified_at: Some(ago(30)),
            },
            DigitalIdentity {
                digital_id: DigitalId::new("DID-67890"),
                name: "Marie Dubois".into(),
                nationality: "France".into(),
                status: VerificationStatus::Verified,
                visa_type: "e-Tourist Visa".into(),
                issue_date: date(2024, 2, 10),
                expiry_date: date(2024, 11, 10),
                last_seen: ago(60),
                location: "Connaught Place".into(),
                verification_count: 8,
                blockchain_tx: "0x4b2e9d1f6a3c".into(),
                consent_scope: vec!["location".into(), "itinerary".into()],
                flag_reason: None,
                pending_reason: None,
                last_verified_at: Some(ago(60)),
            },
            DigitalIdentity {
                digital_id: DigitalId::new("DID-98765"),
                name: "Hiroshi Tanaka".into(),
                nationality: "Japan".into(),
                status: VerificationStatus::Pending,
                visa_type: "Tourist Visa".into(),
                issue_date: date(2024, 3, 1),
                expiry_date: date(2025, 3, 1),
                last_seen: ago(5),
                location: "Connaught Place".into(),
                verification_count: 1,
                blockchain_tx: "0x9c8d7e6f5a4b".into(),
                consent_scope: vec!["location".into()],
                flag_reason: None,
                pending_reason: Some("Document review in progress".into()),
                last_verified_at: None,
            },
            DigitalIdentity {
                digital_id: DigitalId::new("DID-54321"),
                name: "Klaus Weber".into(),
                nationality: "Germany".into(),
                status: VerificationStatus::Flagged,
                visa_type: "Business Visa".into(),
                issue_date: date(2024, 1, 5),
                expiry_date: date(2024, 7, 5),
                last_seen: ago(180),
                location: "Chandni Chowk".into(),
                verification_count: 4,
                blockchain_tx: "0x1f2e3d4c5b6a".into(),
                consent_scope: vec!["location".into(), "emergency_contact".into()],
                flag_reason: Some("Visa validity mismatch".into()),
                pending_reason: None,
                last_verified_at: Some(ago(240)),
            },
        ];

        let calls = vec![
            OperatorCall {
                id: CallId::new("CALL-001"),
                incident_id: None,
                caller_id: "+91-98765-43210".into(),
                caller_location: "Connaught Place".into(),
                call_type: "emergency".into(),
                priority: Priority::High,
                status: CallStatus::Active,
                start_time: ago(5),
                end_time: None,
                duration: None,
                operator_id: Some("op-1".into()),
                operator_name: Some("Maya Singh".into()),
                summary: "Tourist in distress near the metro exit".into(),
                actions: vec!["Police unit notified".into()],
                language_detected: Some("English".into()),
                outcome: None,
            },
            OperatorCall {
                id: CallId::new("CALL-002"),
                incident_id: None,
                caller_id: "+91-91234-56789".into(),
                caller_location: "India Gate".into(),
                call_type: "medical".into(),
                priority: Priority::Emergency,
                status: CallStatus::Incoming,
                start_time: ago(1),
                end_time: None,
                duration: None,
                operator_id: None,
                operator_name: None,
                summary: "Caller reports a tourist with breathing difficulty".into(),
                actions: Vec::new(),
                language_detected: Some("French".into()),
                outcome: None,
            },
            OperatorCall {
                id: CallId::new("CALL-003"),
                incident_id: Some(IncidentId::new("INC-2024-004")),
                caller_id: "+91-99887-76655".into(),
                caller_location: "Chandni Chowk".into(),
                call_type: "fraud".into(),
                priority: Priority::Medium,
                status: CallStatus::Incoming,
                start_time: ago(2),
                end_time: None,
                duration: None,
                operator_id: None,
                operator_name: None,
                summary: "Overcharging by unlicensed guide".into(),
                actions: Vec::new(),
                language_detected: Some("Hindi".into()),
                outcome: None,
            },
            OperatorCall {
                id: CallId::new("CALL-000"),
                incident_id: Some(IncidentId::new("INC-2024-003")),
                caller_id: "+91-90000-11111".into(),
                caller_location: "India Gate".into(),
                call_type: "medical".into(),
                priority: Priority::High,
                status: CallStatus::Completed,
                start_time: ago(125),
                end_time: Some(ago(121)),
                duration: Some(240),
                operator_id: Some("op-1".into()),
                operator_name: Some("Maya Singh".into()),
                summary: "Ambulance dispatched, tourist stabilised".into(),
                actions: vec!["Ambulance dispatched".into(), "Hospital informed".into()],
                language_detected: Some("English".into()),
                outcome: Some("Call completed successfully".into()),
            },
        ];

        let audit_entries = vec![
            AuditEntry {
                id: AuditId::new("AUDIT-001"),
                action: "PII_ACCESS".into(),
                user: "Officer Sarah Chen".into(),
                resource: "Tourist Profile DID-12345".into(),
                timestamp: ago(30),
                status: AuditStatus::Approved,
                approved_by: Some("Admin User".into()),
            },
            AuditEntry {
                id: AuditId::new("AUDIT-002"),
                action: "INCIDENT_ASSIGN".into(),
                user: "Dispatcher Kumar".into(),
                resource: "INC-2024-001".into(),
                timestamp: ago(60),
                status: AuditStatus::Completed,
                approved_by: None,
            },
        ];

        let alerts = vec![
            Alert {
                id: AlertId::new("ALERT-001"),
                kind: AlertKind::Emergency,
                title: "Emergency SOS Alert".into(),
                message: "Tourist in distress at Connaught Place. Immediate response required.".into(),
                timestamp: ago(5),
                priority: Priority::High,
                location: "Connaught Place".into(),
                digital_id: Some(DigitalId::new("DID-98765")),
            },
            Alert {
                id: AlertId::new("ALERT-002"),
                kind: AlertKind::Incident,
                title: "New Incident Reported".into(),
                message: "Theft reported near India Gate. Assigned to Officer Chen.".into(),
                timestamp: ago(15),
                priority: Priority::Medium,
                location: "India Gate".into(),
                digital_id: None,
            },
            Alert {
                id: AlertId::new("ALERT-003"),
                kind: AlertKind::Info,
                title: "Digital ID Verified".into(),
                message: "Tourist digital ID DID-12345 successfully verified.".into(),
                timestamp: ago(30),
                priority: Priority::Low,
                location: "Red Fort".into(),
                digital_id: Some(DigitalId::new("DID-12345")),
            },
        ];

        Self {
            incidents,
            zones,
            digital_identities,
            calls,
            audit_entries,
            alerts,
        }
    }

    /// Next `AUDIT-NNN` key, one past the highest numeric suffix seen.
    pub fn next_audit_id(&self) -> AuditId {
        let highest = self
            .audit_entries
            .iter()
            .filter_map(|e| e.id.as_str().strip_prefix("AUDIT-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        AuditId::new(format!("AUDIT-{:03}", highest + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_keys_are_unique() {
        let fx = Fixtures::demo(Utc::now());
        let mut ids: Vec<_> = fx.incidents.iter().map(|i| i.id.as_str().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), fx.incidents.len());
        assert_eq!(fx.zones.len(), 3);
    }

    #[test]
    fn audit_keys_continue_the_sequence() {
        let fx = Fixtures::demo(Utc::now());
        assert_eq!(fx.next_audit_id().as_str(), "AUDIT-003");
        assert_eq!(Fixtures::empty().next_audit_id().as_str(), "AUDIT-001");
    }
}
