//! Local keyword classifier used when the remote endpoint cannot answer.
//!
//! Rules are evaluated in declaration order and the first rule whose keyword
//! occurs anywhere in the lowercased input wins. Matching is plain substring
//! containment, so short keywords such as `hi` also fire inside longer words.
//!
//! Canned replies are templates: every [`OWNER_PLACEHOLDER`] is replaced with
//! the classifier's owner name when a reply is produced. The built-in facts
//! (schools, internship, projects) describe the default owner; other owners
//! should supply their own table through [`FallbackClassifier::with_rules`].

use serde::Serialize;

use crate::config::DEFAULT_OWNER_NAME;

/// Marker substituted with the owner name in reply templates.
pub const OWNER_PLACEHOLDER: &str = "{owner}";

/// Reply template used when no keyword group matches.
pub const GENERIC_RESPONSE: &str = "Hmm, let me think about that! 🤔 I'm here to chat about {owner} and his awesome journey as a developer! Try asking me about his projects, skills, education, or experience - I've got tons of fun stories to share! 😄💫";

/// Topic a visitor message was classified into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordGroup {
    /// Questions about the owner's name.
    Identity,
    /// Portfolio projects.
    Projects,
    /// Skills and technologies.
    Skills,
    /// Schooling.
    Education,
    /// Professional experience.
    Experience,
    /// Getting in touch.
    Contact,
    /// Small talk openers.
    Greeting,
}

/// One classifier rule: any keyword selects the fixed response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    /// Group this rule answers for.
    pub group: KeywordGroup,
    /// Lowercase keywords, any of which selects the rule.
    pub keywords: &'static [&'static str],
    /// Canned reply template.
    pub response: &'static str,
}

impl KeywordRule {
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|keyword| normalized.contains(keyword))
    }
}

/// Built-in rules in priority order.
pub const DEFAULT_RULES: [KeywordRule; 7] = [
    KeywordRule {
        group: KeywordGroup::Identity,
        keywords: &["name", "full name", "called"],
        response: "His name is {owner}! 😊 That's his full name - simple, memorable, and perfect for a future tech star! He's currently a 4th-year Computer Science student who's already making waves in the tech world! 🌟",
    },
    KeywordRule {
        group: KeywordGroup::Projects,
        keywords: &["project", "work"],
        response: "Oh, you want to know about {owner}'s amazing projects? 🚀 He's built some incredible stuff! Like FlashAI with 1000+ users, YogaLife wellness platform, and InterviewAce with AI-powered interviews! Which one sounds most interesting to you? 😊",
    },
    KeywordRule {
        group: KeywordGroup::Skills,
        keywords: &["skill", "technology", "tech"],
        response: "{owner} is a tech wizard! 🧙‍♂️ He's mastered React, Next.js, Node.js, MongoDB, and even AI/ML integration! Plus he's got that sweet BharatPe internship experience. Want to know more about any specific tech? 💻✨",
    },
    KeywordRule {
        group: KeywordGroup::Education,
        keywords: &["education", "university", "study"],
        response: "He's studying Computer Science at Graphic Era Hill University with a solid 7.89 CGPA! 📚 Smart cookie, right? He went to St. Lawrence School in Haldwani before that. Education goals! 🎓",
    },
    KeywordRule {
        group: KeywordGroup::Experience,
        keywords: &["experience", "internship", "bharatpe"],
        response: "Oh yes! {owner} worked as a Full Stack Web Developer Intern at BharatPe! 💼 He built awesome MERN stack applications and RESTful APIs. Pretty cool for a student, don't you think? 😎",
    },
    KeywordRule {
        group: KeywordGroup::Contact,
        keywords: &["contact", "reach", "hire"],
        response: "Looking to connect with {owner}? Smart choice! 🤝 Check out his amazing portfolio - you can find all his contact info and project links right here on this website! He's always excited about new opportunities! 🌟",
    },
    KeywordRule {
        group: KeywordGroup::Greeting,
        keywords: &["hello", "hi", "hey"],
        response: "Hey there, new friend! 👋 I'm so excited to tell you about {owner}! He's this amazing developer who builds AI-powered applications and has already worked at BharatPe! What would you like to know about him? 🤖✨",
    },
];

/// Result of classifying one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Matched group, `None` for the generic reply.
    pub group: Option<KeywordGroup>,
    /// Reply text with the owner name filled in.
    pub response: String,
}

/// Ordered keyword rules plus a generic reply, rendered for one owner.
#[derive(Clone, Debug)]
pub struct FallbackClassifier {
    rules: &'static [KeywordRule],
    generic: &'static str,
    owner_name: String,
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::for_owner(DEFAULT_OWNER_NAME)
    }
}

impl FallbackClassifier {
    /// Built-in rules speaking about `owner_name`.
    ///
    /// A blank name falls back to [`DEFAULT_OWNER_NAME`].
    #[must_use]
    pub fn for_owner(owner_name: &str) -> Self {
        let owner_name = owner_name.trim();
        let owner_name = if owner_name.is_empty() {
            DEFAULT_OWNER_NAME
        } else {
            owner_name
        };
        Self {
            rules: &DEFAULT_RULES,
            generic: GENERIC_RESPONSE,
            owner_name: owner_name.to_string(),
        }
    }

    /// Classifier with a custom rule table for the default owner.
    ///
    /// Keywords must be lowercase. A blank `generic` reply is replaced with
    /// [`GENERIC_RESPONSE`].
    #[must_use]
    pub fn with_rules(rules: &'static [KeywordRule], generic: &'static str) -> Self {
        let generic = if generic.trim().is_empty() {
            GENERIC_RESPONSE
        } else {
            generic
        };
        Self {
            rules,
            generic,
            ..Self::default()
        }
    }

    /// Same rules, rendered for another owner.
    #[must_use]
    pub fn with_owner(self, owner_name: &str) -> Self {
        Self {
            rules: self.rules,
            generic: self.generic,
            ..Self::for_owner(owner_name)
        }
    }

    /// Rules in priority order.
    #[must_use]
    pub const fn rules(&self) -> &'static [KeywordRule] {
        self.rules
    }

    /// Name substituted into every reply.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Classify `message`. Pure and case-insensitive.
    #[must_use]
    pub fn classify(&self, message: &str) -> Classification {
        let normalized = message.to_lowercase();
        let (group, template) = self
            .rules
            .iter()
            .find(|rule| rule.matches(&normalized) && !rule.response.trim().is_empty())
            .map_or((None, self.generic), |rule| (Some(rule.group), rule.response));

        Classification {
            group,
            response: self.render(template),
        }
    }

    /// Reply text for `message`.
    #[must_use]
    pub fn respond(&self, message: &str) -> String {
        self.classify(message).response
    }

    /// Generic reply for this owner.
    #[must_use]
    pub fn generic_response(&self) -> String {
        self.render(self.generic)
    }

    fn render(&self, template: &str) -> String {
        template.replace(OWNER_PLACEHOLDER, &self.owner_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_for(group: KeywordGroup) -> String {
        DEFAULT_RULES
            .iter()
            .find(|rule| rule.group == group)
            .map(|rule| rule.response.replace(OWNER_PLACEHOLDER, DEFAULT_OWNER_NAME))
            .unwrap()
    }

    #[test]
    fn test_each_group_has_its_response() {
        let classifier = FallbackClassifier::default();
        let cases = [
            ("What's his full name?", KeywordGroup::Identity),
            ("Tell me about his projects", KeywordGroup::Projects),
            ("which skills does he have", KeywordGroup::Skills),
            ("Where did he get his education?", KeywordGroup::Education),
            ("any internship?", KeywordGroup::Experience),
            ("how can I contact him", KeywordGroup::Contact),
            ("hello", KeywordGroup::Greeting),
        ];

        for (input, group) in cases {
            let classification = classifier.classify(input);
            assert_eq!(classification.group, Some(group), "input: {input}");
            assert_eq!(classification.response, response_for(group));
        }
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let classifier = FallbackClassifier::default();
        assert_eq!(
            classifier.respond("PROJECTS please"),
            classifier.respond("projects please")
        );
        assert_eq!(
            classifier.classify("SkIlLs").group,
            Some(KeywordGroup::Skills)
        );
    }

    #[test]
    fn test_unmatched_input_gets_generic_reply() {
        let classifier = FallbackClassifier::default();
        let classification = classifier.classify("quantum pizza");
        assert_eq!(classification.group, None);
        assert_eq!(classification.response, classifier.generic_response());
        assert!(classification.response.contains(DEFAULT_OWNER_NAME));
        assert_eq!(classifier.respond(""), classifier.generic_response());
    }

    #[test]
    fn test_first_declared_group_wins() {
        let classifier = FallbackClassifier::default();
        assert_eq!(
            classifier.classify("what is the name of his project").group,
            Some(KeywordGroup::Identity)
        );
        assert_eq!(
            classifier.classify("hey, what tech does he use?").group,
            Some(KeywordGroup::Skills)
        );
    }

    #[test]
    fn test_substring_matching_is_preserved() {
        let classifier = FallbackClassifier::default();
        // "this" contains "hi"
        assert_eq!(
            classifier.classify("is this real").group,
            Some(KeywordGroup::Greeting)
        );
        // "network" contains "work"
        assert_eq!(
            classifier.classify("network").group,
            Some(KeywordGroup::Projects)
        );
    }

    #[test]
    fn test_custom_rules() {
        static RULES: [KeywordRule; 1] = [KeywordRule {
            group: KeywordGroup::Contact,
            keywords: &["email"],
            response: "Write to jane@example.com",
        }];
        let classifier = FallbackClassifier::with_rules(&RULES, "  ");

        assert_eq!(classifier.respond("Email?"), "Write to jane@example.com");
        assert_eq!(
            classifier.respond("hello"),
            GENERIC_RESPONSE.replace(OWNER_PLACEHOLDER, DEFAULT_OWNER_NAME)
        );
        assert_eq!(classifier.rules().len(), 1);
    }

    #[test]
    fn test_replies_name_the_configured_owner() {
        let classifier = FallbackClassifier::for_owner("Jane Doe");
        assert_eq!(classifier.owner_name(), "Jane Doe");

        for input in ["what's the full name", "projects?", "skills", "hire", "hello", "??"] {
            let reply = classifier.respond(input);
            assert!(!reply.contains(DEFAULT_OWNER_NAME), "input: {input}");
            assert!(!reply.contains(OWNER_PLACEHOLDER), "input: {input}");
        }
        assert!(classifier.respond("skills").contains("Jane Doe"));
        assert!(classifier.generic_response().contains("Jane Doe"));
    }

    #[test]
    fn test_custom_rules_keep_owner() {
        static RULES: [KeywordRule; 1] = [KeywordRule {
            group: KeywordGroup::Contact,
            keywords: &["email"],
            response: "Write to {owner} at jane@example.com",
        }];
        let classifier =
            FallbackClassifier::with_rules(&RULES, "Ask about {owner}").with_owner("Jane");

        assert_eq!(classifier.respond("email"), "Write to Jane at jane@example.com");
        assert_eq!(classifier.respond("hello"), "Ask about Jane");
        assert_eq!(
            FallbackClassifier::for_owner("  ").owner_name(),
            DEFAULT_OWNER_NAME
        );
    }

    #[test]
    fn test_every_response_is_non_empty() {
        for rule in FallbackClassifier::default().rules() {
            assert!(!rule.response.is_empty());
            assert!(rule.keywords.iter().all(|k| *k == k.to_lowercase()));
        }
    }
}
