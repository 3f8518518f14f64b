//! Prompt builders.
//!
//! Pure string construction. The one hard contract: user content is embedded
//! verbatim, char for char, because the span locator later matches the
//! model's echoed `text` fields against the same text.

use shared_types::{TopicAnswer, VisionAnalysis};

/// Instruction for the writing-analysis call.
pub fn analysis_prompt(content: &str) -> String {
    format!(
        r#"你是一个写作教练。用户会发给你ta的作品。请注意，你输出的内容要和原文中完全一样，不能更改。你需要输出：
1、“亮点句子”，即你认为当中优美、富有文学性、思想性的句子
2、“可改进句子”，即你认为可以写得更具体、更有画面感的句子
3、“可改进动词”，即你认为可以改进得更精准、富有文学价值的动词。标准示例：我“排出”九文大钱 比 我“拿出”九文大钱要精准

分析内容：
{content}

要求：
- 精选最有代表性的内容，highlights、improvements、verbReplacements各选择2-4个
- text字段要与原文完全一致
- start和end是在原文中的字符位置索引
- comment要简洁明了，提供具体的分析
- suggestion要给出具体的改进建议

重要：
- highlights数组中每个对象的type字段必须是"excellent"
- improvements数组中每个对象的type字段必须是"improvement"
- verbReplacements数组中每个对象的type字段必须是"verb"
- 不要使用其他type值，严格按照要求"#
    )
}

/// System prompt for the writing chat. Not shown to the learner.
pub fn chat_system_prompt(current_writing: &str) -> String {
    let writing = if current_writing.is_empty() {
        "用户还没有开始写作"
    } else {
        current_writing
    };

    format!(
        r#"你是一个专业的写作助手，专门帮助用户改进他们的写作。用户当前的写作内容是：

{writing}

请基于用户的写作内容提供有针对性的建议和帮助。你可以：
1. 分析写作结构和逻辑
2. 提供改进建议
3. 回答关于写作的问题
4. 帮助扩展和深化内容
5. 提供写作技巧和灵感

请用友好、鼓励的语气回复，并确保建议具体且实用。如果用户还没有开始写作，请鼓励他们开始创作。"#
    )
}

/// Instruction for the free-writing topic generator.
pub fn topic_prompt(answers: &[TopicAnswer]) -> String {
    let interests = answers
        .iter()
        .map(|a| format!("- {}: {}", a.question, a.answer))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"你是一个文学写作教练。你的任务是生成一个可以在5~10分钟内完成的写作练习。（这个练习包含：1、基于用户的个人经历、兴趣爱好等，以一个短语或一句话为中心的、富有文学张力的主题 2、体裁要求，在用户不指定的情况下随机 3、部分可能的写作方向。）
# 用户兴趣爱好
{interests}
"#
    )
}

/// Instruction for the image-region tip call. Object ids in the prompt are
/// the ids the model must echo back so tips can be merged onto regions.
pub fn region_tips_prompt(analysis: &VisionAnalysis) -> String {
    let caption = analysis
        .caption
        .as_ref()
        .map(|c| c.text.as_str())
        .unwrap_or("（无整体描述）");

    let regions = analysis
        .objects
        .iter()
        .enumerate()
        .map(|(idx, obj)| format!("- id: obj-{idx}, 名称: {}", obj.name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"你是一个写作教练。下面是一张照片的整体描述和检测到的物体区域。请为每个区域生成一条简短的描写建议，引导小学生观察并描写这个物体（视觉、情感或想象角度均可）。

整体描述：{caption}

物体区域：
{regions}

要求：
- regions数组中每个对象的id字段必须与上面给出的id完全一致
- tip要具体、适合小学生，且只针对对应的物体"#
    )
}

/// The id assigned to object `idx` in [`region_tips_prompt`].
pub fn region_id(idx: usize) -> String {
    format!("obj-{idx}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Caption, VisionObject};

    #[test]
    fn analysis_prompt_embeds_content_verbatim() {
        let content = "我走出学校大门。\n春天的花园真美。";
        let prompt = analysis_prompt(content);
        assert!(prompt.contains(content));
    }

    #[test]
    fn analysis_prompt_pins_type_tags() {
        let prompt = analysis_prompt("内容");
        assert!(prompt.contains("\"excellent\""));
        assert!(prompt.contains("\"improvement\""));
        assert!(prompt.contains("\"verb\""));
    }

    #[test]
    fn chat_prompt_embeds_writing_verbatim() {
        let writing = "秋天的第一片落叶。";
        assert!(chat_system_prompt(writing).contains(writing));
    }

    #[test]
    fn chat_prompt_handles_empty_writing() {
        assert!(chat_system_prompt("").contains("用户还没有开始写作"));
    }

    #[test]
    fn topic_prompt_lists_question_answer_pairs() {
        let answers = vec![
            TopicAnswer {
                question: "你最喜欢的季节是什么？".to_string(),
                answer: "冬天".to_string(),
            },
            TopicAnswer {
                question: "你养过宠物吗？".to_string(),
                answer: String::new(),
            },
        ];
        let prompt = topic_prompt(&answers);
        assert!(prompt.contains("- 你最喜欢的季节是什么？: 冬天"));
        assert!(prompt.contains("- 你养过宠物吗？: "));
    }

    #[test]
    fn region_prompt_assigns_stable_ids() {
        let analysis = VisionAnalysis {
            caption: Some(Caption {
                text: "a mountain lake".to_string(),
                confidence: 0.9,
            }),
            objects: vec![
                VisionObject {
                    name: "tree".to_string(),
                    confidence: 0.8,
                    bounding_box: None,
                },
                VisionObject {
                    name: "boat".to_string(),
                    confidence: 0.7,
                    bounding_box: None,
                },
            ],
            tags: vec![],
        };
        let prompt = region_tips_prompt(&analysis);
        assert!(prompt.contains("id: obj-0, 名称: tree"));
        assert!(prompt.contains("id: obj-1, 名称: boat"));
        assert_eq!(region_id(1), "obj-1");
    }
}
