//! Deterministic fallback question bank used when the AI payload is unusable.

use crate::quiz::{Level, Question, QuestionMap};

/// Build the hardcoded 9-question fallback quiz about `subject`.
///
/// Never calls any external service and always yields a complete map with
/// three questions per tier and ids `fallback-1` through `fallback-9`.
pub fn fallback_question_map(subject: &str) -> QuestionMap {
    let bank: [(&str, String, [&str; 4], &str); 9] = [
        (
            "fallback-1",
            format!("What genre best describes {subject}?"),
            ["Fantasy", "Reality", "Sci-fi", "History"],
            "Fantasy",
        ),
        (
            "fallback-2",
            format!("Which element is most associated with {subject}?"),
            ["Power", "Magic", "Music", "War"],
            "Magic",
        ),
        (
            "fallback-3",
            format!("What is a key theme in {subject}?"),
            ["Friendship", "Revenge", "Adventure", "Mystery"],
            "Adventure",
        ),
        (
            "fallback-4",
            format!("Which type of conflict appears in {subject}?"),
            ["Internal", "Political", "Romantic", "Mythical"],
            "Mythical",
        ),
        (
            "fallback-5",
            format!("What drives the main character in {subject}?"),
            ["Power", "Love", "Justice", "Survival"],
            "Justice",
        ),
        (
            "fallback-6",
            format!("Who faces the biggest danger in {subject}?"),
            ["Side character", "Villain", "Hero", "Everyone"],
            "Hero",
        ),
        (
            "fallback-7",
            format!("What is a hidden symbol in {subject}?"),
            ["Snake", "Lion", "Crown", "Mirror"],
            "Mirror",
        ),
        (
            "fallback-8",
            format!("What is the deepest theme of {subject}?"),
            ["Power", "Death", "Love", "Memory"],
            "Death",
        ),
        (
            "fallback-9",
            format!("What separates casual fans from true fans of {subject}?"),
            [
                "Knowing quotes",
                "Understanding lore",
                "Soundtrack knowledge",
                "Character names",
            ],
            "Understanding lore",
        ),
    ];

    let mut map = QuestionMap::default();
    for (slot, (id, question, options, answer)) in bank.into_iter().enumerate() {
        let level = Level::ALL[slot / 3];
        map.level_mut(level).push(Question {
            id: id.to_owned(),
            question,
            options: options.iter().map(|option| (*option).to_owned()).collect(),
            answer: answer.to_owned(),
            difficulty: level.difficulty(),
        });
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Difficulty;

    #[test]
    fn fallback_is_complete_and_deterministic() {
        let map = fallback_question_map("Dune");

        assert_eq!(map.beginner.len(), 3);
        assert_eq!(map.intermediate.len(), 3);
        assert_eq!(map.master.len(), 3);
        assert_eq!(map, fallback_question_map("Dune"));

        let ids: Vec<&str> = Level::ALL
            .iter()
            .flat_map(|level| map.level(*level))
            .map(|question| question.id.as_str())
            .collect();
        let expected: Vec<String> = (1..=9).map(|n| format!("fallback-{n}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn subject_is_substituted_and_answers_stay_in_options() {
        let map = fallback_question_map("Hollow Knight");

        for level in Level::ALL {
            for question in map.level(level) {
                assert!(question.question.contains("Hollow Knight"));
                assert!(question.options.contains(&question.answer));
            }
        }

        assert_eq!(map.master[0].difficulty, Difficulty::Hard);
    }
}
