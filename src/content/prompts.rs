//! Prompt builders for every content category.
//!
//! The structural requirements (item counts, required sub-groupings,
//! forbidden content) are embedded in the instruction text; the response
//! shape itself is enforced separately by the declared output schema.

use crate::models::{ExamType, Topic, UserAnswer};

/// Practice exam prompt, specialized per track.
pub fn practice_exam(exam: ExamType) -> String {
    match exam {
        ExamType::Phlebotomy => "You are an expert curriculum developer for the National Healthcareer Association (NHA) specializing in Phlebotomy (CPT). Your task is to generate a JSON array containing exactly 150 multiple-choice questions for a practice exam. It is critical and mandatory that the final output is a single JSON array with exactly 150 question objects. The questions must be unique and modeled after the topics and question styles found in NHA reference materials.\n\nKey areas: Order of Draw, Tube Additives & Departments, Patient Identification, Special Collections, Complications, Site Selection, Procedural Steps.".to_string(),
        ExamType::Ekg => "You are an expert curriculum developer for the National Healthcareer Association (NHA) specializing in EKG/ECG (CET). Your task is to generate a JSON array containing exactly 150 multiple-choice questions for a practice exam. It is critical and mandatory that the final output is a single JSON array with exactly 150 question objects. The questions must be unique.\n\nKey areas: Rhythm Strip Interpretation, Pacemaker Rhythms, Lead Placement (12/5/3 lead), Artifacts, Machine Operation, Patient Prep, Heart Rate Calculation, Cardiac Anatomy.".to_string(),
        ExamType::Ccma => format!(
            "You are an expert curriculum developer for the National Healthcareer Association (NHA). Your task is to generate a JSON array containing exactly 150 multiple-choice questions for a practice exam for the {exam} certification. It is critical and mandatory that the final output is a single JSON array with exactly 150 question objects. Do not truncate the list. Each question object must conform to the provided JSON schema. The questions must be unique and accurately reflect the style, difficulty, and content domains of the official NHA exam. For each question, provide the question text, an array of 4 options, the exact text of the correct answer, and a concise explanation for the correct answer. Ensure the questions cover all key areas of the {exam} exam."
        ),
    }
}

/// Personalized study guide over a set of missed questions.
pub fn study_guide(exam: ExamType, missed: &[UserAnswer]) -> String {
    let questions_text = missed
        .iter()
        .enumerate()
        .map(|(index, q)| {
            format!(
                "{}. Question: {}\n   Correct Answer: {}\n   Topic Context: {}",
                index + 1,
                q.question,
                q.correct_answer,
                q.explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert NHA exam tutor. A student just took a {exam} practice exam and missed the following questions. \n\n\
         Based on these incorrect answers, generate a personalized Study Guide.\n\
         1. Group the missed concepts into 3-5 Key Focus Areas.\n\
         2. For each area, explain the underlying concept they need to study.\n\
         3. Provide specific tips or mnemonics to remember this material.\n\
         4. Keep the tone encouraging but educational.\n\
         5. Do NOT just list the questions again; analyze WHY they might have missed them and fix the knowledge gap.\n\n\
         Missed Questions:\n{questions_text}"
    )
}

fn general_flashcards(exam: ExamType) -> String {
    format!(
        "You are an expert educator specializing in NHA certifications. Create a comprehensive set of 130 essential flashcards for the {exam} exam. For each flashcard, provide a key 'term', a clear and concise 'definition', and detailed 'context'. The 'context' field is critical: it must explain the clinical significance, provide a practical example of its use in a healthcare setting, or offer a memory aid. \n\nIMPORTANT NHA REQUIREMENT: If the exam covers clinical skills (CCMA/Phlebotomy), you MUST include specific flashcards detailing needle gauge sizes (e.g., 21G, 22G, 23G, 25G) and needle length/depth considerations for various procedures (IM, SQ, ID, Venipuncture) and patient types (Pediatric vs Geriatric), strictly based on NHA reference material."
    )
}

const SHORTHAND_DECK: &str = "Create 40 flashcards covering essential medical abbreviations and terminology prefixes/suffixes common in NHA exams (e.g., bid, tid, qd, po, NPO, PRN, Hyper-, Hypo-, -itis, -ectomy). Provide the term, definition, and context.";

const GRIEF_DECK: &str = "Create 15 flashcards for Psychology & Grief. \n1. MUST include a card specifically listing the 5 Stages of Grief in strictly chronological order (Denial -> Anger -> Bargaining -> Depression -> Acceptance).\n2. MUST include cards for Erikson's Stages of Psychosocial Development (e.g., Trust vs. Mistrust, Autonomy vs. Shame, Integrity vs. Despair) relevant to patient care.\n3. Include therapeutic communication techniques and coping mechanisms.";

const VITALS_DECK: &str = "Create 30 flashcards covering Normal and Abnormal Vital Signs for different age groups (Infant, Child, Adult) and Common Lab Values (Sodium, Potassium, Glucose, HgbA1c, Cholesterol, Hematocrit/Hemoglobin) based on NHA standards.";

const PREVENTIVE_DECK: &str = "Create 25 flashcards covering Preventive Care: Recommended Screening Tests by age (Mammogram, Colonoscopy, Pap smear) and Immunization Schedules (Pediatric and Adult) per CDC/NHA guidelines.";

const PATHOLOGY_DECK: &str = "Create 30 flashcards classifying common diseases by pathogen type (Bacterial, Viral, Fungal, Parasitic/Protozoan). Example: Influenza (Viral), Strep Throat (Bacterial), Malaria (Parasitic). Include transmission methods.";

const TUBE_DRAW_DECK: &str = "Create 25 flashcards for the Phlebotomy Order of Draw and Tube Additives. \n1. MUST have a card explicitly listing the full Venipuncture Order of Draw (Cultures -> Citrate -> Serum -> Heparin -> EDTA -> Fluoride).\n2. MUST have a card explicitly listing the Capillary Order of Draw (Blood Gas -> EDTA -> Other Additives -> Serum).\n3. Use 'EDTA' generally, do not distinguish K2/K3.\n4. Include common tests for each tube.";

const SPECIALIZED_DECK: &str = "Create 25 flashcards for Specialized Lab Collections based on NHA standards. Include: 1. Blood Cultures (Aerobic vs Anaerobic order, skin prep). 2. Newborn Screenings (PKU). 3. Forensic Testing (Chain of Custody). 4. Special Handling: Bilirubin (Protect from light), Ammonia/Lactic Acid (Ice slurry), Cold Agglutinins (Keep warm).";

const EKG_LEADS_DECK: &str = "Create 30 flashcards for EKG Leads and Cardiac Anatomy. \n1. Lead Placement: Exact location for V1-V6 and limb leads.\n2. LEAD GROUPINGS & HEART WALLS: You MUST include cards mapping leads to walls (e.g., 'Leads II, III, aVF' -> 'Inferior Wall'; 'Leads I, aVL, V5, V6' -> 'Lateral Wall'; 'Leads V1, V2' -> 'Septal'; 'Leads V3, V4' -> 'Anterior').\n3. Anatomy: Electrical Conduction System (SA Node -> AV Node -> Bundle of His -> Bundle Branches -> Purkinje Fibers) and their intrinsic rates.\n4. Blood flow through heart chambers and valves.";

pub const EKG_RHYTHMS_DECK: &str = "Create a set of 15 EKG flashcards covering essential rhythms and calculation methods for the CET exam. \n1. Rhythms: Normal Sinus Rhythm, Sinus Bradycardia, Sinus Tachycardia, A-Fib, A-Flutter, SVT, V-Tach, V-Fib, Asystole, Heart Blocks (1st, 2nd Type 1 & 2, 3rd).\n2. HEART RATE CALCULATION METHODS: You MUST include specific flashcards for the '1500 Method', '300 (Sequence) Method', and '6-Second Method'.\nFor each card provide:\n1. 'interpretation': The name (or method).\n2. 'explanation': Key criteria (or the formula/technique).\n3. 'responseProcedure': The NHA REQUIRED intervention (e.g., 'Start CPR', 'Monitor') OR 'Calculation Technique' for method cards.\n4. 'visualPrompt': A description to generate the EKG image or a diagram of the calculation method.";

pub const BODY_POSITIONS_DECK: &str = "Create a set of 10 flashcards for Patient Body Positions. \nPositions: Supine, Prone, Dorsal Recumbent, Lithotomy, Sims (Lateral), Fowler's, Semi-Fowler's, Knee-Chest, Trendelenburg. \nIMPORTANT RULES:\n1. 'Fowler's' is 90 degrees (upright).\n2. 'Semi-Fowler's' is 45 degrees (reclining).\n3. DO NOT include High Fowler's.\n4. Provide 'visualPrompt' for a medical illustration.";

/// Deck prompt for any topic. The general deck is parameterized by the
/// exam type; every other topic has a fixed instruction.
pub fn deck_prompt(topic: Topic, exam: ExamType) -> String {
    match topic {
        Topic::General => general_flashcards(exam),
        Topic::Shorthand => SHORTHAND_DECK.to_string(),
        Topic::Grief => GRIEF_DECK.to_string(),
        Topic::Vitals => VITALS_DECK.to_string(),
        Topic::Preventive => PREVENTIVE_DECK.to_string(),
        Topic::Pathology => PATHOLOGY_DECK.to_string(),
        Topic::TubeDraw => TUBE_DRAW_DECK.to_string(),
        Topic::Specialized => SPECIALIZED_DECK.to_string(),
        Topic::EkgLeads => EKG_LEADS_DECK.to_string(),
        Topic::EkgRhythms => EKG_RHYTHMS_DECK.to_string(),
        Topic::BodyPositions => BODY_POSITIONS_DECK.to_string(),
    }
}

/// Visual prompt for an EKG card image.
pub fn ekg_image(visual_prompt: &str) -> String {
    format!(
        "Generate a clear, high-contrast medical illustration or EKG strip showing: {visual_prompt}"
    )
}

/// Visual prompt for a body-position card image.
pub fn body_position_image(position_name: &str, visual_prompt: &str) -> String {
    format!(
        "Generate a simple, clear, line-art style medical illustration of a patient in the {position_name} position. {visual_prompt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_prompt_is_specialized_per_track() {
        assert!(practice_exam(ExamType::Phlebotomy).contains("Order of Draw"));
        assert!(practice_exam(ExamType::Ekg).contains("Rhythm Strip Interpretation"));
        assert!(practice_exam(ExamType::Ccma).contains("CCMA (Certified Clinical Medical Assistant)"));
        for exam in ExamType::ALL {
            assert!(practice_exam(exam).contains("exactly 150"));
        }
    }

    #[test]
    fn study_guide_prompt_numbers_missed_questions() {
        let missed = vec![
            UserAnswer {
                question: "Which tube is drawn first?".to_string(),
                selected_answer: "EDTA".to_string(),
                is_correct: false,
                correct_answer: "Blood cultures".to_string(),
                explanation: "Sterile collections precede additives.".to_string(),
            },
            UserAnswer {
                question: "Normal adult pulse range?".to_string(),
                selected_answer: "40-60".to_string(),
                is_correct: false,
                correct_answer: "60-100".to_string(),
                explanation: "Resting adult heart rate is 60-100 bpm.".to_string(),
            },
        ];

        let prompt = study_guide(ExamType::Phlebotomy, &missed);
        assert!(prompt.contains("1. Question: Which tube is drawn first?"));
        assert!(prompt.contains("2. Question: Normal adult pulse range?"));
        assert!(prompt.contains("Correct Answer: Blood cultures"));
        assert!(prompt.contains("Key Focus Areas"));
    }

    #[test]
    fn general_deck_prompt_embeds_exam_and_count() {
        let prompt = deck_prompt(Topic::General, ExamType::Ekg);
        assert!(prompt.contains("130 essential flashcards"));
        assert!(prompt.contains("EKG Technician (CET)"));
    }

    #[test]
    fn body_positions_deck_excludes_high_fowlers() {
        let prompt = deck_prompt(Topic::BodyPositions, ExamType::Ccma);
        assert!(prompt.contains("DO NOT include High Fowler's"));
    }
}
