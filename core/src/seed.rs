//! Sample catalog used by the demo binary and by fresh deployments.
//!
//! Mirrors the five events the original application ships with. Sold counts
//! start at zero: a seeded count with no backing reservations would break the
//! sold-count conservation invariant.

use crate::types::{EventDraft, Money};
use chrono::{NaiveDate, NaiveTime};

/// Drafts for the five sample events.
#[must_use]
pub fn sample_events() -> Vec<EventDraft> {
    vec![
        draft(
            "Tech Conference 2025",
            "Annual technology conference featuring keynotes from industry leaders, workshops, and networking opportunities.",
            (2025, 3, 15),
            (9, 0),
            "San Francisco, CA",
            "Conference",
            29_900,
            500,
            "/tech-conference-hall.png",
            "Tech Events Inc",
        ),
        draft(
            "Design Workshop",
            "Interactive workshop on modern UI/UX design principles with hands-on exercises and expert guidance.",
            (2025, 3, 20),
            (14, 0),
            "New York, NY",
            "Workshop",
            14_900,
            50,
            "/design-workshop-creative-space.jpg",
            "Design Academy",
        ),
        draft(
            "Startup Networking Event",
            "Connect with fellow entrepreneurs, investors, and industry mentors in an exclusive networking setting.",
            (2025, 3, 25),
            (18, 0),
            "Austin, TX",
            "Networking",
            7_900,
            200,
            "/startup-networking-event.png",
            "Startup Hub",
        ),
        draft(
            "Web Development Bootcamp",
            "Intensive bootcamp covering modern web technologies, frameworks, and best practices for professional development.",
            (2025, 4, 1),
            (10, 0),
            "Seattle, WA",
            "Course",
            49_900,
            100,
            "/coding-bootcamp-classroom.jpg",
            "DevSchool",
        ),
        draft(
            "Marketing Summit",
            "Discover latest trends in digital marketing, SEO, social media strategies, and brand development.",
            (2025, 4, 5),
            (9, 0),
            "Los Angeles, CA",
            "Summit",
            19_900,
            300,
            "/marketing-conference-audience.jpg",
            "Marketing Pro",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn draft(
    title: &str,
    description: &str,
    (year, month, day): (i32, u32, u32),
    (hour, minute): (u32, u32),
    location: &str,
    category: &str,
    price_cents: u64,
    capacity: u32,
    image: &str,
    organizer: &str,
) -> EventDraft {
    EventDraft {
        title: title.into(),
        description: description.into(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
        location: location.into(),
        category: category.into(),
        price: Money::from_cents(price_cents),
        capacity,
        image: image.into(),
        organizer: organizer.into(),
    }
}
