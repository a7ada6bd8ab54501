//! Response composer — turns (category, repeat flag, known name) into a reply.
//!
//! Every category owns exactly two canned templates: a first-time one and a
//! repeat-aware one that acknowledges the topic was raised before. Each
//! template carries its own handoff flag, so downstream code never has to
//! re-scan reply text for marker phrases to decide whether to offer the
//! contact affordance.

use crate::intent::Category;

/// A composed assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Whether the host should offer the "contact support" affordance.
    pub suggests_handoff: bool,
}

struct Template {
    text: &'static str,
    suggests_handoff: bool,
}

struct TemplatePair {
    first: Template,
    repeat: Template,
}

/// Phrases that already address the user directly; prefixing a name onto
/// these reads doubly-addressed.
const ACK_PHRASES: &[&str] = &["I notice", "You mentioned"];

const GREETING: TemplatePair = TemplatePair {
    first: Template {
        text: "Hello! Welcome to Gradlink. I'm here to help you with anything related to our \
               university application platform, course finder, student accommodation, and more. \
               What would you like assistance with today?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "I see you're greeting me again! Is there something specific I can help you with \
               regarding your university journey or Gradlink's services?",
        suggests_handoff: false,
    },
};

const CONTACT_REQUEST: TemplatePair = TemplatePair {
    first: Template {
        text: "I'd be happy to connect you with our support team for further assistance. Please \
               use the contact button below to reach out to our support team directly.",
        suggests_handoff: true,
    },
    repeat: Template {
        text: "You mentioned wanting to speak with our support team earlier. Would you like me \
               to connect you with personalized assistance right now?",
        suggests_handoff: true,
    },
};

const INSTITUTION: TemplatePair = TemplatePair {
    first: Template {
        text: "Gradlink partners with over 50 South African institutions, including traditional \
               universities, universities of technology, and private institutions. You can \
               browse them all on our Institutions page and apply to several universities with \
               a single application. Would you like help finding specific institutions or \
               courses?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "I notice you're asking about universities again. Are you looking for something \
               more specific? We partner with traditional universities, universities of \
               technology, and private institutions. Would you like personalized guidance to \
               find the right fit for you?",
        suggests_handoff: true,
    },
};

const COURSE: TemplatePair = TemplatePair {
    first: Template {
        text: "Our Course Finder helps you discover the right program for your interests and \
               career goals, with courses across Engineering, Business, Health Sciences, \
               Information Technology, the Arts, and more. You can also take our Career \
               Assessment to get personalized course recommendations. Would you like me to \
               guide you to the Course Finder?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "You're still exploring course options? That's great! Would you benefit from \
               personalized course recommendations based on your interests and career goals? I \
               can connect you with our support team for tailored guidance.",
        suggests_handoff: true,
    },
};

const ACCOMMODATION: TemplatePair = TemplatePair {
    first: Template {
        text: "Gradlink runs an accommodation marketplace with student residences, shared \
               accommodation, and private rentals near major universities across South Africa. \
               You can search by location, price range, and amenities, and every listing \
               includes photos, prices, and contact details. Need help finding accommodation \
               in a specific area?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "Still searching for the right accommodation? Our team can provide personalized \
               assistance to find housing that fits your needs and budget. Would you like me to \
               connect you with our accommodation specialists?",
        suggests_handoff: true,
    },
};

const APPLICATION: TemplatePair = TemplatePair {
    first: Template {
        text: "With Gradlink you can apply to multiple universities and institutions with just \
               one application! Fill in your information once, select your preferred \
               institutions, and submit. You can then track your applications and receive \
               updates directly through our platform. Would you like help starting an \
               application?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "I see you're still interested in the application process. Would you like \
               step-by-step guidance tailored to your situation? Our support team can provide \
               personalized assistance with your applications.",
        suggests_handoff: true,
    },
};

const CAREER: TemplatePair = TemplatePair {
    first: Template {
        text: "Our Career Assessment helps you discover your ideal career path and study \
               options based on your interests, strengths, and goals. It's free, available \
               from our Course Finder page, and gives personalized suggestions for courses and \
               institutions. Would you like to take the assessment?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "Considering the career assessment again? It's a valuable tool! Would you like \
               personalized career guidance from our team to complement the assessment results?",
        suggests_handoff: true,
    },
};

const PRICING: TemplatePair = TemplatePair {
    first: Template {
        text: "Application fees vary by institution, ranging from free applications to around \
               R440, and we list detailed pricing for each institution. Accommodation typically \
               runs from R2,500 to R12,000+ per month depending on location and amenities. You \
               can filter by price range on both our Institutions and Accommodation pages.",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "Cost is definitely an important factor in your decision. Would you like \
               personalized financial guidance and information about funding options available \
               to you?",
        suggests_handoff: true,
    },
};

const LOCATION: TemplatePair = TemplatePair {
    first: Template {
        text: "Gradlink covers institutions and accommodation across all major South African \
               cities, including Johannesburg, Cape Town, Durban, and Pretoria. You can search \
               by location on our platform, and many accommodation listings sit close to major \
               universities for easy access to campus.",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "Looking at locations again? Each city offers unique opportunities. Would you \
               like personalized advice about which location might suit your field of study and \
               career goals best?",
        suggests_handoff: true,
    },
};

const HELP: TemplatePair = TemplatePair {
    first: Template {
        text: "I can help you with:\n• Finding and applying to universities\n• \
               Discovering courses and career paths\n• Searching for student \
               accommodation\n• Taking the career assessment\n• Understanding \
               application processes\n\nWhat specific area would you like help with?",
        suggests_handoff: false,
    },
    repeat: Template {
        text: "I'm here to help! Since you're asking again, would you prefer to speak with one \
               of our human specialists who can provide more detailed, personalized assistance?",
        suggests_handoff: true,
    },
};

const FALLBACK: TemplatePair = TemplatePair {
    first: Template {
        text: "I'm here to help with Gradlink's services, including university applications, \
               course selection, student accommodation, and career guidance. For more \
               specialized assistance beyond what I can provide, would you like me to connect \
               you with our support team?",
        suggests_handoff: true,
    },
    repeat: Template {
        text: "I notice you're asking about this again. Would you like me to connect you with \
               our support team for more personalized assistance? They can provide detailed \
               guidance tailored to your specific needs.",
        suggests_handoff: true,
    },
};

fn template_for(category: Category, is_repeat: bool) -> &'static Template {
    let pair = match category {
        Category::Greeting => &GREETING,
        Category::ContactRequest => &CONTACT_REQUEST,
        Category::Institution => &INSTITUTION,
        Category::Course => &COURSE,
        Category::Accommodation => &ACCOMMODATION,
        Category::Application => &APPLICATION,
        Category::Career => &CAREER,
        Category::Pricing => &PRICING,
        Category::Location => &LOCATION,
        Category::Help => &HELP,
        Category::Fallback => &FALLBACK,
    };
    if is_repeat {
        &pair.repeat
    } else {
        &pair.first
    }
}

/// Compose the reply for one turn. Total over all inputs.
///
/// If a name is known and the chosen template does not already address the
/// user (no acknowledgement phrase, name not already present), the reply is
/// prefixed with `"<name>, "`.
pub fn compose(category: Category, is_repeat: bool, known_name: Option<&str>) -> Reply {
    let template = template_for(category, is_repeat);
    let mut text = template.text.to_string();

    if let Some(name) = known_name {
        let acknowledges = ACK_PHRASES.iter().any(|p| template.text.contains(p));
        if !acknowledges && !template.text.contains(name) {
            text = format!("{}, {}", name, text);
        }
    }

    Reply {
        text,
        suggests_handoff: template.suggests_handoff,
    }
}
