use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::event::{EventRow, EventType, Platform};

/// Caller-facing note attached to synthetic results.
pub const DEMO_MESSAGE: &str = "Showing sample results for demonstration";

struct DemoTemplate {
    name: &'static str,
    description: &'static str,
    event_type: EventType,
    platform: Platform,
    link: &'static str,
    keywords: &'static str,
}

static TEMPLATES: [DemoTemplate; 4] = [
    DemoTemplate {
        name: "Tech Innovation Summit 2024",
        description: "Join industry leaders discussing the latest technological innovations \
                      and future trends in AI, blockchain, and sustainable tech solutions.",
        event_type: EventType::Online,
        platform: Platform::Linkedin,
        link: "https://example.com/tech-summit",
        keywords: "tech, innovation, AI, blockchain",
    },
    DemoTemplate {
        name: "Digital Marketing Conference",
        description: "Learn cutting-edge digital marketing strategies from top professionals. \
                      Network with marketing experts and discover new tools.",
        event_type: EventType::Onsite,
        platform: Platform::Facebook,
        link: "https://example.com/marketing-conf",
        keywords: "marketing, digital, strategy, networking",
    },
    DemoTemplate {
        name: "Startup Pitch Competition",
        description: "Watch emerging startups pitch their innovative ideas to investors. \
                      Interactive Q&A sessions and networking opportunities included.",
        event_type: EventType::Online,
        platform: Platform::Twitter,
        link: "https://example.com/pitch-comp",
        keywords: "startup, pitch, investment, networking",
    },
    DemoTemplate {
        name: "Creative Photography Workshop",
        description: "Learn advanced photography techniques, editing tips, and creative \
                      composition from professional photographers. Share your work and get feedback.",
        event_type: EventType::Online,
        platform: Platform::Instagram,
        link: "https://example.com/photo-workshop",
        keywords: "photography, creative, workshop, editing",
    },
];

/// Synthetic placeholder events for a search that matched nothing. Templates
/// are filtered to the requested platform and stamped with a start 0-7 days
/// into the requested window and a 2-8 hour duration. The only contract is
/// platform match plus timestamps inside/after the window; the distribution
/// is not a correctness property.
pub fn sample_events(platform: Platform, start_date: DateTime<Utc>) -> Vec<EventRow> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    TEMPLATES
        .iter()
        .filter(|t| t.platform == platform)
        .map(|t| {
            let start = start_date + Duration::days(rng.gen_range(0..=7));
            let end = start + Duration::hours(rng.gen_range(2..=8));
            EventRow {
                id: Uuid::new_v4(),
                name: t.name.to_string(),
                description: t.description.to_string(),
                event_type: t.event_type.as_str().to_string(),
                platform: t.platform.as_str().to_string(),
                link: t.link.to_string(),
                start_date: start,
                end_date: end,
                keywords: t.keywords.to_string(),
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_platform_has_a_template() {
        for platform in Platform::ALL {
            let events = sample_events(platform, Utc::now());
            assert!(!events.is_empty(), "no template for {platform}");
            assert!(events.iter().all(|e| e.platform == platform.as_str()));
        }
    }

    #[test]
    fn test_start_within_seven_days_of_window() {
        let window_start = Utc::now();
        for _ in 0..50 {
            for event in sample_events(Platform::Linkedin, window_start) {
                assert!(event.start_date >= window_start);
                assert!(event.start_date <= window_start + Duration::days(7));
            }
        }
    }

    #[test]
    fn test_duration_between_two_and_eight_hours() {
        let window_start = Utc::now();
        for _ in 0..50 {
            for event in sample_events(Platform::Instagram, window_start) {
                let duration = event.end_date - event.start_date;
                assert!(duration >= Duration::hours(2));
                assert!(duration <= Duration::hours(8));
            }
        }
    }
}
