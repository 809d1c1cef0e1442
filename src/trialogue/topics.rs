//! Ready-made conversation topics, grouped by flavor.

/// A named group of suggested topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicCategory {
    pub name: &'static str,
    pub topics: &'static [&'static str],
}

pub const SUGGESTED_TOPICS: [TopicCategory; 4] = [
    TopicCategory {
        name: "🤖 Technology & AI",
        topics: &[
            "How to teach programming to beginners",
            "Where AI will and will not replace people",
            "What matters most in a code review",
            "Remote work vs office work",
        ],
    },
    TopicCategory {
        name: "🧠 Philosophy",
        topics: &[
            "What is creativity",
            "Balancing efficiency and humanity",
            "Is a perfect system a good system",
            "Data or intuition, which should we trust",
        ],
    },
    TopicCategory {
        name: "📅 Everyday life",
        topics: &[
            "The ideal morning routine",
            "The best method for time management",
            "Building a focused home office",
            "How to learn more efficiently",
        ],
    },
    TopicCategory {
        name: "⚡ Debates",
        topics: &[
            "Perfectionism vs getting it done",
            "Planning ahead vs improvising",
            "Simple vs feature-rich",
            "Individual vs team optimization",
        ],
    },
];

/// Every suggested topic, category by category.
pub fn all_topics() -> impl Iterator<Item = &'static str> {
    SUGGESTED_TOPICS
        .iter()
        .flat_map(|category| category.topics.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_categories_of_four() {
        assert!(SUGGESTED_TOPICS.iter().all(|c| c.topics.len() == 4));
        assert_eq!(all_topics().count(), 16);
    }
}
