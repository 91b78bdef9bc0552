//! Prompt templates for the speaker classifier and the empathy grader

/// Ask which diarized speaker is the customer and which the agent
pub fn speaker_prompt(dialogue: &str) -> String {
    format!(
        r#"ROLE:
You analyse customer care calls. You receive a transcript with two speakers, A and B, and decide which one is the Customer Service Agent and which one is the Customer.

CONTEXT:
A speaker who raises complaints, describes a problem or asks for help is most likely the Customer. A speaker who offers solutions or guides the other person is most likely the Customer Service Agent.

CONSTRAINTS:
- Read every line of the conversation before deciding.
- If unsure, choose the most likely assignment.
- Answer with JSON only, in exactly this shape:
{{"Speaker A": "Customer", "Speaker B": "Customer Service Agent", "Confidence": "92%"}}

INPUT:
Transcript:
{}"#,
        dialogue
    )
}

/// Ask for per-turn empathy grades of every agent response
pub fn empathy_prompt(labeled_transcript: &str) -> String {
    format!(
        r#"You are an impartial quality auditor evaluating empathy in a customer service call.

The transcript below contains Customer and Customer Service Agent turns.

Instructions:
1. Read the transcript turn by turn.
2. For each agent response, evaluate empathy toward the preceding customer message.
3. Score three dimensions, each between 0 and 1:
   - emotion_recognition: the agent names or notices the customer's feelings
   - emotion_validation: the agent accepts those feelings as reasonable
   - support_intent: the agent commits to helping
4. Give 1 only when the agent's exact words support it. Without evidence the score is 0. Politeness alone is not empathy.
5. final_empathy_score is the mean of the three dimensions for that response.
6. Give a short, concrete reason for every score.

Return a JSON array with one entry per agent response, in this shape:
[
  {{"Customer message": "...",
    "Agent response": "...",
    "Empathy": {{
      "emotion_recognition": 0.0,
      "emotion_validation": 0.0,
      "support_intent": 0.0,
      "final_empathy_score": 0.0,
      "Valid Reason": "..."}}
  }}
]

Transcript:
{}"#,
        labeled_transcript
    )
}
