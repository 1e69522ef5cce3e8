//! Domain model types.

mod question;

pub use question::{
    AnswerOption, AnswerRecord, CategoriesResponse, Category, Difficulty, Question,
    QuestionsResponse, RawQuestion,
};
