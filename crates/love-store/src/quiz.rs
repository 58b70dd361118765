//! Playing through the relationship quiz.

use crate::records::QuizQuestion;

/// Progress through one play of the quiz.
///
/// A correct answer scores a point, a wrong one takes a point away without
/// going below zero. Each question accepts a single answer.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    answered: Option<usize>,
    complete: bool,
}

/// Outcome of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Wrong { correct: usize },
    /// The question was already answered or the quiz is over.
    Ignored,
}

impl QuizSession {
    pub fn new(mut questions: Vec<QuizQuestion>) -> Self {
        questions.sort_by_key(|q| q.question_number);
        let complete = questions.is_empty();
        Self {
            questions,
            current: 0,
            score: 0,
            answered: None,
            complete,
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.complete {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Answer the current question with a zero-based option index.
    pub fn answer(&mut self, option: usize) -> Answer {
        if self.answered.is_some() {
            return Answer::Ignored;
        }
        let Some(question) = self.current() else {
            return Answer::Ignored;
        };
        let correct = (question.correct_option.max(1) - 1) as usize;

        self.answered = Some(option);
        if option == correct {
            self.score += 1;
            Answer::Correct
        } else {
            self.score = self.score.saturating_sub(1);
            Answer::Wrong { correct }
        }
    }

    /// Move to the next question, completing the quiz after the last one.
    /// Does nothing until the current question is answered.
    pub fn next(&mut self) {
        if self.complete || self.answered.is_none() {
            return;
        }
        self.answered = None;
        if self.current + 1 >= self.questions.len() {
            self.complete = true;
        } else {
            self.current += 1;
        }
    }

    pub fn restart(&mut self) {
        self.current = 0;
        self.score = 0;
        self.answered = None;
        self.complete = self.questions.is_empty();
    }

    /// Score as a percentage of the number of questions.
    pub fn percentage(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        f64::from(self.score) / self.questions.len() as f64 * 100.0
    }

    pub fn score_message(&self) -> &'static str {
        let percentage = self.percentage();
        if percentage == 100.0 {
            "Perfect! You know us by heart!"
        } else if percentage >= 75.0 {
            "Amazing! You really pay attention!"
        } else if percentage >= 50.0 {
            "Not bad! We have more memories to make."
        } else {
            "Looks like we need more dates to refresh your memory!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn questions() -> Vec<QuizQuestion> {
        let project = Uuid::now_v7();
        vec![
            QuizQuestion::new(project, 2, "Favourite food?", ["Pizza", "Sushi", "Tacos", "Pasta"], 2),
            QuizQuestion::new(project, 1, "First date?", ["Cafe", "Park", "Restaurant", "Movies"], 3),
        ]
    }

    #[test]
    fn test_questions_in_order() {
        let session = QuizSession::new(questions());
        assert_eq!(session.current().unwrap().question, "First date?");
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_scoring() {
        let mut session = QuizSession::new(questions());
        assert_eq!(session.answer(2), Answer::Correct);
        assert_eq!(session.answer(0), Answer::Ignored);
        assert_eq!(session.score(), 1);

        session.next();
        assert_eq!(session.answer(0), Answer::Wrong { correct: 1 });
        assert_eq!(session.score(), 0);

        session.next();
        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert_eq!(session.answer(1), Answer::Ignored);
    }

    #[test]
    fn test_score_never_negative() {
        let mut session = QuizSession::new(questions());
        assert_eq!(session.answer(0), Answer::Wrong { correct: 2 });
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_next_requires_answer() {
        let mut session = QuizSession::new(questions());
        session.next();
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_perfect_score_and_restart() {
        let mut session = QuizSession::new(questions());
        session.answer(2);
        session.next();
        session.answer(1);
        session.next();
        assert!(session.is_complete());
        assert_eq!(session.percentage(), 100.0);
        assert_eq!(session.score_message(), "Perfect! You know us by heart!");

        session.restart();
        assert!(!session.is_complete());
        assert_eq!(session.score(), 0);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_empty_quiz_is_complete() {
        let session = QuizSession::new(Vec::new());
        assert!(session.is_complete());
        assert_eq!(session.percentage(), 0.0);
    }
}
