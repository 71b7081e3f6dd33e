//! User-facing prompt text and oracle prompt templates
//!
//! All conversational text lives here, in both supported languages, so the
//! state machine contains no literals. Hindi strings mirror the English set.

use scheme_agent_core::{Field, Gender, Language};

use crate::constants::INDIAN_STATES_AND_UTS;

/// Opening message, shown together with the first question
pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::English => {
            "Hello! I'm SchemeBot, your assistant for finding Indian government \
             schemes you may be eligible for. To provide personalized \
             recommendations, I need to ask you a few questions."
        }
        Language::Hindi => {
            "नमस्ते! मैं स्कीमबॉट हूँ, आपका सहायक जो आपको पात्र हो सकने वाली भारत सरकार की \
             योजनाओं को खोजने में मदद करता है। व्यक्तिगत सिफारिशें प्रदान करने के लिए, मुझे आपसे \
             कुछ प्रश्न पूछने होंगे।"
        }
    }
}

/// The open question for a field
pub fn question(field: Field, language: Language) -> &'static str {
    match (field, language) {
        (Field::Name, Language::English) => "Please tell me your name.",
        (Field::Gender, Language::English) => "Are you male, female, or other?",
        (Field::Age, Language::English) => "What is your age?",
        (Field::State, Language::English) => "Which state in India do you live in?",
        (Field::Name, Language::Hindi) => "कृपया मुझे अपना नाम बताएं।",
        (Field::Gender, Language::Hindi) => "क्या आप पुरुष हैं, महिला हैं, या अन्य हैं?",
        (Field::Age, Language::Hindi) => "आपकी उम्र क्या है?",
        (Field::State, Language::Hindi) => "आप भारत के किस राज्य में रहते हैं?",
    }
}

/// Re-ask text after a failed extraction or rejected value
pub fn retry_question(field: Field, language: Language) -> &'static str {
    match (field, language) {
        (Field::Name, Language::English) => {
            "I'm having trouble understanding your name. Could you please tell me \
             your name again?"
        }
        (Field::Gender, Language::English) => {
            "I'm having trouble understanding your gender. Please specify if you \
             are male, female, or other."
        }
        (Field::Age, Language::English) => {
            "I'm having trouble understanding your age. Please provide your age in \
             years."
        }
        (Field::State, Language::English) => {
            "I'm having trouble understanding your state. Please specify which \
             state or union territory in India you live in."
        }
        (Field::Name, Language::Hindi) => {
            "मुझे आपका नाम समझने में कठिनाई हो रही है। कृपया अपना नाम फिर से बताएं।"
        }
        (Field::Gender, Language::Hindi) => {
            "मुझे आपका लिंग समझने में कठिनाई हो रही है। कृपया स्पष्ट करें कि आप पुरुष हैं, महिला \
             हैं, या अन्य हैं।"
        }
        (Field::Age, Language::Hindi) => {
            "मुझे आपकी उम्र समझने में कठिनाई हो रही है। कृपया अपनी उम्र वर्षों में बताएं।"
        }
        (Field::State, Language::Hindi) => {
            "मुझे आपका राज्य समझने में कठिनाई हो रही है। कृपया भारत का राज्य या केंद्र शासित प्रदेश \
             बताएं जहां आप रहते हैं।"
        }
    }
}

/// After repeated failures: ask the user to pick from an enumerated list
/// rather than free text. Name and age have no meaningful enumeration, so
/// they get a maximally constrained instruction instead.
pub fn enumerated_question(field: Field, language: Language) -> String {
    match (field, language) {
        (Field::Gender, Language::English) => {
            let options: Vec<&str> = Gender::all().iter().map(|g| g.as_str()).collect();
            format!(
                "Let's try once more. Please reply with exactly one of: {}.",
                options.join(", ")
            )
        }
        (Field::State, Language::English) => format!(
            "Let's try once more. Please reply with one of the following states \
             or union territories: {}.",
            INDIAN_STATES_AND_UTS.join(", ")
        ),
        (Field::Name, Language::English) => {
            "Let's try once more. Please reply with only your name, nothing else.".to_string()
        }
        (Field::Age, Language::English) => {
            "Let's try once more. Please reply with only your age as a number, \
             for example: 25."
                .to_string()
        }
        (Field::Gender, Language::Hindi) => {
            "आइए एक बार फिर कोशिश करें। कृपया इनमें से केवल एक लिखें: पुरुष, महिला, अन्य।".to_string()
        }
        (Field::State, Language::Hindi) => format!(
            "आइए एक बार फिर कोशिश करें। कृपया इनमें से एक राज्य या केंद्र शासित प्रदेश लिखें: {}।",
            INDIAN_STATES_AND_UTS.join(", ")
        ),
        (Field::Name, Language::Hindi) => {
            "आइए एक बार फिर कोशिश करें। कृपया केवल अपना नाम लिखें।".to_string()
        }
        (Field::Age, Language::Hindi) => {
            "आइए एक बार फिर कोशिश करें। कृपया केवल अपनी उम्र अंकों में लिखें, जैसे: 25।".to_string()
        }
    }
}

/// Did-you-mean confirmation for a corrected value
pub fn confirm_correction(
    field: Field,
    proposed: &str,
    original: &str,
    language: Language,
) -> String {
    match language {
        Language::English => format!(
            "I understood \"{}\" as your {}. Did you mean {}? (yes/no)",
            original, field, proposed
        ),
        Language::Hindi => format!(
            "मैंने \"{}\" को {} समझा। क्या आपका मतलब {} है? (हाँ/नहीं)",
            original,
            field_hi(field),
            proposed
        ),
    }
}

/// Confirmation for a value spotted earlier in the conversation
pub fn confirm_prefill(field: Field, value: &str, language: Language) -> String {
    match language {
        Language::English => format!(
            "Earlier you mentioned {} — should I use that as your {}? (yes/no)",
            value, field
        ),
        Language::Hindi => format!(
            "आपने पहले {} बताया था — क्या मैं इसे आपका {} मान लूँ? (हाँ/नहीं)",
            value,
            field_hi(field)
        ),
    }
}

/// Disambiguation question when fuzzy matching has no clear winner
pub fn disambiguation(candidates: &[String], language: Language) -> String {
    match language {
        Language::English => format!(
            "I'm not sure which state you mean. Did you mean {}?",
            candidates.join(" or ")
        ),
        Language::Hindi => format!(
            "मुझे यकीन नहीं है कि आपका कौन सा राज्य है। क्या आपका मतलब {} है?",
            candidates.join(" या ")
        ),
    }
}

/// Shown when the last field is confirmed, before the recommendations
pub fn thank_you(language: Language) -> &'static str {
    match language {
        Language::English => {
            "Thank you for providing all the information! Let me find some schemes \
             that might be relevant for you."
        }
        Language::Hindi => {
            "सभी जानकारी प्रदान करने के लिए धन्यवाद! मुझे आपके लिए प्रासंगिक योजनाएँ खोजने दें।"
        }
    }
}

/// Summary line above the ranked results
pub fn results_summary(num_schemes: usize, language: Language) -> String {
    match language {
        Language::English => format!(
            "Based on your information, I've found {} government scheme{} you \
             might be eligible for.",
            num_schemes,
            if num_schemes == 1 { "" } else { "s" }
        ),
        Language::Hindi => format!(
            "आपकी जानकारी के आधार पर, मुझे {} सरकारी योजनाएँ मिली हैं जिनके लिए आप पात्र हो सकते हैं।",
            num_schemes
        ),
    }
}

/// Shown when no scheme survives filtering
pub fn no_results(language: Language) -> &'static str {
    match language {
        Language::English => {
            "I couldn't find any schemes that match your profile. You might want \
             to check the official government websites for more information."
        }
        Language::Hindi => {
            "मुझे आपके प्रोफ़ाइल से मेल खाने वाली कोई योजना नहीं मिली। आप अधिक जानकारी के लिए \
             सरकारी वेबसाइटों को देख सकते हैं।"
        }
    }
}

/// Reply to any input after the session has produced its recommendations
pub fn session_complete(language: Language) -> &'static str {
    match language {
        Language::English => {
            "Your recommendations are ready above. Check the details of each \
             scheme for eligibility, benefits, and how to apply."
        }
        Language::Hindi => {
            "आपकी सिफारिशें ऊपर तैयार हैं। पात्रता, लाभ और आवेदन करने के तरीके के लिए प्रत्येक \
             योजना का विवरण देखें।"
        }
    }
}

/// System prompt for the oracle when extracting one field
///
/// Asks for exactly one structured field as a JSON object; the reply parser
/// treats anything else as "no candidate".
pub fn extraction_system(field: Field, language: Language) -> String {
    let mut prompt = format!(
        "You are an information extraction assistant for a government scheme \
         advisor. Your task is to extract the user's {field} from the \
         conversation.\n\
         Return your response as a JSON object with exactly these fields:\n\
         1. \"value\": the extracted {field} (string)\n\
         2. \"confidence\": your confidence in the extraction (number between 0 and 1)\n\
         If you cannot find the information, return an empty string for value \
         and 0 for confidence. Return only the JSON object, nothing else.",
        field = field
    );

    match field {
        Field::Gender => {
            prompt.push_str("\nNormalize gender to \"Male\", \"Female\", or \"Other\".");
        }
        Field::Age => {
            prompt.push_str("\nNormalize age to a number in years.");
        }
        Field::State => {
            prompt.push_str(
                "\nNormalize to a standard Indian state or union territory name in English.",
            );
        }
        Field::Name => {
            prompt.push_str("\nReturn only the person's name, without greetings or filler.");
        }
    }

    if language == Language::Hindi {
        prompt.push_str(
            "\nThe user may be communicating in Hindi or Hinglish (Hindi words \
             written in English script). Understand both. Examples: \
             \"Mera naam Rahul hai\" -> \"Rahul\"; \
             \"Main 25 saal ka hoon\" -> \"25\"; \
             \"Main Dilli mein rehta hoon\" -> \"Delhi\"; \
             \"Main ladka hoon\" -> \"Male\".",
        );
    }

    prompt
}

fn field_hi(field: Field) -> &'static str {
    match field {
        Field::Name => "नाम",
        Field::Gender => "लिंग",
        Field::Age => "उम्र",
        Field::State => "राज्य",
    }
}
