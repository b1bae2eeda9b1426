//! Persona prompt assembly

use crate::error::{Error, Result};
use crate::types::Chunk;

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// Separator placed between context chunks
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Default receptionist persona
pub const DEFAULT_PERSONA_TEMPLATE: &str = r#"You are Presi, a smart, friendly, and eager-to-help receptionist assistant. Your goal is to communicate with customers just like a real human receptionist would: warm, welcoming, and professional.

When responding:
- Do not hallucinate or make up information.
- Use the provided context to answer questions accurately and concisely.
- First read through each piece of information carefully and understand it.
- Keep your responses short and to the point, like a real receptionist would.
- Speak naturally, like you're talking to someone face-to-face at a front desk, and try to speak as little as possible.
- Word limit is 50 words approximately.
- Always sound courteous, cheerful, and confident.
- Avoid technical placeholders or rough values such as '#', 'XX', '*' or other vague symbols. Only use clear and specific language, with no emojis and no expressions in keywords.
- If you're unsure about something, offer to find out more or direct them politely.
- If information is not available, let the user know kindly instead of making up false details.
- Do not greet the user or say "Hi" in your response; just start with the answer directly, like you have been talking to that user for hours.
- Use a friendly and helpful tone, as if you are a real receptionist assistant.
- Do not end the chat with a question.
- Do not disclose any personal information about the school's fee structure; direct to the websites.
- Try to answer it short within a paragraph of about 150 words and make it concise, but not vague, like a real receptionist assistant would do.

Tone example:
"I'd be happy to help you with that."
"Let me check that for you right away!"
"Thanks so much for your patience. I've found the details you're looking for."

Here is some helpful context:

{context}

Now, please respond to the user's question in the tone and style of Presi.
Question: {question}
Answer:"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Context,
    Question,
}

/// Persona template with exactly one `{context}` and one `{question}` slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTemplate {
    segments: Vec<Segment>,
}

impl PersonaTemplate {
    /// Parse a template, rejecting missing or repeated slots
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut context_slots = 0;
        let mut question_slots = 0;
        let mut rest = template;

        loop {
            let next = [(CONTEXT_SLOT, Segment::Context), (QUESTION_SLOT, Segment::Question)]
                .into_iter()
                .filter_map(|(slot, segment)| rest.find(slot).map(|pos| (pos, slot.len(), segment)))
                .min_by_key(|(pos, _, _)| *pos);

            let Some((pos, slot_len, segment)) = next else {
                if !rest.is_empty() {
                    segments.push(Segment::Literal(rest.to_string()));
                }
                break;
            };

            if pos > 0 {
                segments.push(Segment::Literal(rest[..pos].to_string()));
            }
            match segment {
                Segment::Context => context_slots += 1,
                Segment::Question => question_slots += 1,
                Segment::Literal(_) => {}
            }
            segments.push(segment);
            rest = &rest[pos + slot_len..];
        }

        if context_slots != 1 || question_slots != 1 {
            return Err(Error::invalid_config(format!(
                "persona template needs exactly one {} and one {} slot (found {} and {})",
                CONTEXT_SLOT, QUESTION_SLOT, context_slots, question_slots
            )));
        }

        Ok(Self { segments })
    }

    /// Fill the slots
    pub fn render(&self, context: &str, question: &str) -> String {
        let literal_len: usize = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                _ => 0,
            })
            .sum();
        let mut out = String::with_capacity(literal_len + context.len() + question.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Context => out.push_str(context),
                Segment::Question => out.push_str(question),
            }
        }
        out
    }
}

/// Final prompt text handed to the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    /// Prompt text
    pub text: String,
    /// Number of chunks in the context block
    pub context_chunks: usize,
}

impl AssembledPrompt {
    /// Prompt length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the prompt is longer than `limit` characters
    pub fn exceeds(&self, limit: usize) -> bool {
        self.char_len() > limit
    }
}

/// Prompt builder for persona queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join chunk texts, in the given order, with a blank line between them
    pub fn build_context<'a, I>(chunks: I) -> String
    where
        I: IntoIterator<Item = &'a Chunk>,
    {
        chunks
            .into_iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR)
    }

    /// Merge context chunks and the question into the persona template.
    ///
    /// Never truncates; callers compare [`AssembledPrompt::char_len`] with the
    /// service limit.
    pub fn assemble<'a, I>(template: &PersonaTemplate, chunks: I, question: &str) -> AssembledPrompt
    where
        I: IntoIterator<Item = &'a Chunk>,
    {
        let chunks: Vec<&Chunk> = chunks.into_iter().collect();
        let context = Self::build_context(chunks.iter().copied());

        AssembledPrompt {
            text: template.render(&context, question),
            context_chunks: chunks.len(),
        }
    }
}
