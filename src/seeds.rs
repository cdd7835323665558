//! Seed data: the built-in sample catalog.

use crate::domain::{Question, Quiz};
use crate::util::now_millis;

/// Sample quizzes that make the app usable without any external catalog
/// config. Order matters: list queries preserve catalog insertion order.
pub fn seed_quizzes() -> Vec<Quiz> {
  vec![
    Quiz {
      id: "basic-science".into(),
      title: "Basic Science Quiz".into(),
      description: "Test your fundamental science knowledge".into(),
      category: "Science".into(),
      question_count: 10,
      duration: "5 minutes".into(),
      is_popular: true,
      created_at: now_millis(),
      questions: vec![
        Question {
          id: "q1".into(),
          text: "What is the chemical symbol for water?".into(),
          options: vec!["H2O".into(), "CO2".into(), "NaCl".into(), "O2".into()],
          correct_answer_index: 0,
          explanation: Some(
            "Water is composed of two hydrogen atoms and one oxygen atom, hence H2O.".into(),
          ),
        },
        Question {
          id: "q2".into(),
          text: "Which planet is closest to the Sun?".into(),
          options: vec!["Venus".into(), "Mercury".into(), "Earth".into(), "Mars".into()],
          correct_answer_index: 1,
          explanation: Some("Mercury is the innermost planet in our solar system.".into()),
        },
      ],
    },
    Quiz {
      id: "world-history".into(),
      title: "World History Quiz".into(),
      description: "Explore major historical events and figures".into(),
      category: "History".into(),
      question_count: 15,
      duration: "8 minutes".into(),
      is_popular: true,
      created_at: now_millis(),
      questions: vec![
        Question {
          id: "h1".into(),
          text: "In which year did World War II end?".into(),
          options: vec!["1944".into(), "1945".into(), "1946".into(), "1947".into()],
          correct_answer_index: 1,
          explanation: Some("World War II ended in 1945 with the surrender of Japan.".into()),
        },
        Question {
          id: "h2".into(),
          text: "Who was the first President of the United States?".into(),
          options: vec![
            "Thomas Jefferson".into(),
            "John Adams".into(),
            "George Washington".into(),
            "Benjamin Franklin".into(),
          ],
          correct_answer_index: 2,
          explanation: Some(
            "George Washington was the first President of the United States, serving from 1789 to 1797."
              .into(),
          ),
        },
      ],
    },
    Quiz {
      id: "basic-math".into(),
      title: "Basic Mathematics".into(),
      description: "Test your mathematical skills".into(),
      category: "Math".into(),
      question_count: 12,
      duration: "6 minutes".into(),
      is_popular: false,
      created_at: now_millis(),
      questions: vec![Question {
        id: "m1".into(),
        text: "What is 15 + 27?".into(),
        options: vec!["42".into(), "41".into(), "43".into(), "40".into()],
        correct_answer_index: 0,
        explanation: Some("15 + 27 = 42".into()),
      }],
    },
  ]
}
