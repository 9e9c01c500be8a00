//! Console formatting helpers.

/// A horizontal rule of `=` characters.
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// Group digits in thousands: `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `snake_case` → `Title Case`.
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Emoji shown next to an event name.
pub fn event_emoji(event: &str) -> &'static str {
    match event {
        "page_view" => "👁️",
        "view_item" => "🏨",
        "click_external_deal" => "💰",
        "conversion" => "✅",
        "share" => "📤",
        "scroll" => "📜",
        "session_start" => "🚀",
        "first_visit" => "👋",
        "user_engagement" => "👤",
        "content_engagement" => "🎯",
        "image_engagement" => "🖼️",
        "text_engagement" => "📝",
        "section_engagement" => "📄",
        "engagement_quality_score" => "🏆",
        "generate_lead" => "📋",
        "select_item" => "👆",
        _ => "📊",
    }
}
