//! Static FAQ content.

/// Heading of the FAQs screen.
pub const FAQ_HEADING: &str = "Frequently Asked Questions";

/// A question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    /// The question.
    pub question: &'static str,
    /// The answer.
    pub answer: &'static str,
}

/// Every FAQ, in display order.
pub const FAQS: [FaqEntry; 6] = [
    FaqEntry {
        question: "What is SmartLearn?",
        answer: "SmartLearn is an AI-driven platform that creates personalized learning experiences by generating customized courses based on your preferences.",
    },
    FaqEntry {
        question: "How does SmartLearn generate courses?",
        answer: "Courses are generated using the Google Gemini API, considering factors such as difficulty level, time commitment, and learning goals.",
    },
    FaqEntry {
        question: "Can I edit my learning path?",
        answer: "Yes, you can modify the course schedule, reorder topics, and delete topics as needed.",
    },
    FaqEntry {
        question: "What types of resources are included?",
        answer: "SmartLearn provides articles, videos, and interactive tutorials curated from various online platforms.",
    },
    FaqEntry {
        question: "Is there progress tracking?",
        answer: "Yes, SmartLearn tracks your learning progress, including time spent on each lesson and overall course completion percentage.",
    },
    FaqEntry {
        question: "How do notifications work?",
        answer: "You receive reminders based on your selected scheduling frequency, ensuring you stay on track with your learning goals.",
    },
];
