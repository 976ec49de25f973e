//! Built-in fun responders.

use chrono::Weekday;

use super::keyword::KeywordHandler;
use crate::error::Result;

const KFC_KEYWORDS: &[&str] = &[
    "kfc", "肯德基", "疯狂星期四", "星期四", "周四", "炸鸡", "原味鸡", "汉堡", "薯条", "可乐", "疯狂", "v我50", "v我",
    "请我", "请客",
];

const KFC_REPLIES: &[&str] = &[
    "今天是肯德基疯狂星期四！谁能v我50，我想吃原味鸡😋",
    "今天是星期四，肯德基疯狂星期四！谁请我吃炸鸡？🍗",
    "今天是肯德基疯狂星期四！v我50，我请你吃汉堡🍔",
    "今天是星期四，肯德基疯狂星期四！谁v我50，我想吃薯条🍟",
    "今天是肯德基疯狂星期四！谁能v我50，我想喝可乐🥤",
    "今天是星期四，肯德基疯狂星期四！谁请我吃原味鸡？🍗",
    "今天是肯德基疯狂星期四！v我50，我请你吃全家桶🍗",
    "今天是星期四，肯德基疯狂星期四！谁能v我50，我想吃鸡翅🍗",
    "今天是肯德基疯狂星期四！谁请我吃炸鸡？v我50😋",
    "今天是星期四，肯德基疯狂星期四！v我50，我请你吃汉堡🍔",
];

const KFC_EMOJIS: &[&str] = &["😋", "🍗", "🍔", "🍟", "🥤", "😄", "🤤", "😍"];

const KFC_STORY_KEYWORDS: &[&str] = &[
    "故事", "讲个", "说个", "听故事", "讲故事", "今天", "昨天", "前天", "发生", "事情", "我", "朋友", "同学", "同事", "家人",
];

const KFC_STORIES: &[&str] = &[
    "今天我在路上看到一个老人摔倒了，我赶紧跑过去扶他起来。老人很感激，说要请我吃饭。我说不用了，老人坚持要请，最后他说：今天是肯德基疯狂星期四，谁能v我50？😅",
    "昨天我朋友跟我说他失恋了，很伤心。我安慰他说没关系，时间会治愈一切。他说：是的，时间会治愈一切，但今天是肯德基疯狂星期四，谁能v我50？😭",
    "今天上班的时候，老板突然把我叫到办公室，我以为要升职加薪了。结果老板说：今天是肯德基疯狂星期四，谁能v我50？😱",
    "今天我在医院排队挂号，前面有个小朋友一直哭。我问他怎么了，他说：今天是肯德基疯狂星期四，谁能v我50？😢",
    "今天我在银行取钱，ATM机突然坏了。银行工作人员说：今天是肯德基疯狂星期四，谁能v我50？🏦",
    "今天我在超市买菜，收银员突然说：今天是肯德基疯狂星期四，谁能v我50？🛒",
    "今天我在公交车上，司机突然停车说：今天是肯德基疯狂星期四，谁能v我50？🚌",
    "今天我在图书馆看书，管理员突然走过来小声说：今天是肯德基疯狂星期四，谁能v我50？📚",
    "今天我在健身房锻炼，教练突然停下来说：今天是肯德基疯狂星期四，谁能v我50？💪",
    "今天我在咖啡厅喝咖啡，服务员突然走过来神秘地说：今天是肯德基疯狂星期四，谁能v我50？☕",
];

const KFC_STORY_EMOJIS: &[&str] = &["😅", "😭", "😱", "😢", "🏦", "🛒", "🚌", "📚", "💪", "☕"];

const LOVE_KEYWORDS: &[&str] = &[
    "情话", "土味", "表白", "喜欢", "爱", "甜言蜜语", "浪漫", "撩", "撩人", "想你", "爱你", "宝贝", "亲爱的", "土味情话",
    "说情话",
];

const LOVE_LINES: &[&str] = &[
    "你知道我的缺点是什么吗？是缺点你。💕",
    "你知道我想喝什么吗？我想呵护你。🥤",
    "你知道我想吃什么吗？我想痴痴地望着你。😍",
    "你知道我想看什么吗？我想看你的心。👀",
    "你知道我想听什么吗？我想听你的声音。👂",
    "你知道我想抱什么吗？我想抱抱你。🤗",
    "你知道我想成为什么吗？我想成为你的唯一。💎",
    "你知道我想拥有什么吗？我想拥有你的心。❤️",
    "你知道我想守护什么吗？我想守护你的笑容。😊",
    "你知道我想陪伴什么吗？我想陪伴你一生。👫",
    "你知道我想给你什么吗？我想给你我的全部。🎁",
    "你知道我想和你做什么吗？我想和你一起变老。👴👵",
    "你知道我想去哪里吗？我想去你的心里。🏠",
    "你知道我想学什么吗？我想学如何爱你。📚",
    "你知道我想唱什么吗？我想唱情歌给你听。🎵",
    "你知道我想写什么吗？我想写情书给你。📝",
    "你知道我想画什么吗？我想画你的样子。🎨",
    "你知道我想送什么吗？我想送给你我的爱。💝",
    "你知道我想等什么吗？我想等你爱上我。⏰",
    "你知道我想赢什么吗？我想赢得你的心。🏆",
];

const LOVE_STORY_KEYWORDS: &[&str] = &[
    "故事", "讲个", "说个", "听故事", "讲故事", "爱情", "恋爱", "情侣", "夫妻", "恋人", "浪漫", "甜蜜", "幸福", "美好", "温馨",
];

const LOVE_STORIES: &[&str] = &[
    "从前有一个男孩，他每天都会在同一个咖啡厅里看到一个女孩。女孩总是坐在靠窗的位置，安静地看书。男孩鼓起勇气走过去，对女孩说：'你知道我想喝什么吗？我想呵护你。'女孩笑了，从此他们开始了美好的爱情故事。💕",
    "有一个女孩，她每天都会收到一束花，但不知道是谁送的。直到有一天，她发现送花的人是她暗恋已久的男孩。男孩对她说：'你知道我想送什么吗？我想送给你我的爱。'女孩感动得哭了，他们从此幸福地在一起。🌹",
    "有一个男孩，他为了追求心爱的女孩，每天都会在她家楼下等她。无论刮风下雨，他都会准时出现。女孩终于被他的坚持感动了，对他说：'你知道我想等什么吗？我想等你爱上我。'他们从此开始了甜蜜的恋爱。⏰",
    "有一个女孩，她总是觉得自己不够漂亮，不够优秀。直到有一天，一个男孩对她说：'你知道我想守护什么吗？我想守护你的笑容。'女孩终于明白，真正的爱情不是看外表，而是看内心。他们从此幸福地在一起。😊",
    "有一个男孩，他为了给心爱的女孩一个惊喜，学会了做她最爱吃的蛋糕。当女孩看到蛋糕上的字'你知道我想给你什么吗？我想给你我的全部'时，她感动得哭了。他们从此开始了甜蜜的生活。🎂",
    "有一个男孩，他为了追求心爱的女孩，每天都会写一首情诗送给她。女孩被他的才华和真心感动了，对他说：'你知道我想写什么吗？我想写情书给你。'他们从此开始了浪漫的爱情。📝",
];

const LOVE_ADVICE_KEYWORDS: &[&str] = &[
    "建议", "帮助", "怎么办", "如何", "怎么", "表白", "追求", "恋爱", "分手", "复合", "爱情", "感情", "关系", "相处", "沟通",
    "问题", "困扰", "烦恼", "纠结", "迷茫",
];

const LOVE_ADVICE: &[&str] = &[
    "💕 爱情建议 💕\n\n1. 真诚是爱情的基础，不要伪装自己\n2. 沟通是解决问题的关键，有话直说\n3. 尊重对方的想法和选择\n4. 给彼此一些空间和时间\n5. 学会包容和理解\n6. 保持新鲜感，偶尔制造惊喜\n7. 共同成长，一起进步\n8. 珍惜当下，不要轻易放弃\n\n记住：真正的爱情是相互的，不是单方面的付出。💖",
    "💕 表白建议 💕\n\n1. 选择合适的时间和地点\n2. 准备真诚的话语，不要过于华丽\n3. 了解对方的喜好和性格\n4. 不要给太大压力，给对方考虑的时间\n5. 如果被拒绝，要尊重对方的选择\n6. 保持友谊，不要因爱生恨\n7. 提升自己，让自己变得更好\n8. 相信缘分，不要强求\n\n记住：表白不是终点，而是新的开始。💖",
    "💕 相处建议 💕\n\n1. 尊重对方的隐私和空间\n2. 学会换位思考，理解对方\n3. 保持幽默感，让生活有趣\n4. 学会道歉，承认错误\n5. 保持耐心，不要急躁\n6. 学会感恩，珍惜对方的好\n7. 保持健康的生活方式\n8. 共同面对困难，一起成长\n\n记住：相处是一门艺术，需要用心经营。💖",
    "💕 沟通建议 💕\n\n1. 选择合适的时间进行沟通\n2. 用'我'而不是'你'来表达感受\n3. 倾听对方的想法，不要打断\n4. 避免指责和批评，用建设性的语言\n5. 保持冷静，不要情绪化\n6. 寻求共同点，而不是分歧\n7. 学会妥协，找到平衡点\n8. 定期沟通，保持联系\n\n记住：沟通是爱情的桥梁，需要用心搭建。💖",
];

const LOVE_TEST_KEYWORDS: &[&str] = &[
    "测试", "测验", "测", "算", "算算", "爱情", "恋爱", "感情", "缘分", "匹配", "星座", "血型", "性格", "配对", "合适",
];

const LOVE_TESTS: &[&str] = &[
    "💕 爱情测试 💕\n\n问题：你最喜欢什么颜色？\n\nA. 红色 - 热情如火，爱情指数：95%\nB. 蓝色 - 深沉内敛，爱情指数：85%\nC. 绿色 - 自然清新，爱情指数：80%\nD. 粉色 - 温柔浪漫，爱情指数：90%\n\n选择你的答案，看看你的爱情指数吧！💖",
    "💕 爱情测试 💕\n\n问题：你最喜欢什么季节？\n\nA. 春天 - 充满希望，爱情指数：88%\nB. 夏天 - 热情奔放，爱情指数：92%\nC. 秋天 - 成熟稳重，爱情指数：85%\nD. 冬天 - 冷静理智，爱情指数：78%\n\n选择你的答案，看看你的爱情指数吧！💖",
    "💕 爱情测试 💕\n\n问题：你最喜欢什么动物？\n\nA. 猫 - 独立优雅，爱情指数：82%\nB. 狗 - 忠诚热情，爱情指数：95%\nC. 兔子 - 温柔可爱，爱情指数：88%\nD. 鸟 - 自由浪漫，爱情指数：85%\n\n选择你的答案，看看你的爱情指数吧！💖",
    "💕 爱情测试 💕\n\n问题：你最喜欢什么花？\n\nA. 玫瑰 - 浪漫热情，爱情指数：95%\nB. 百合 - 纯洁美好，爱情指数：88%\nC. 向日葵 - 阳光积极，爱情指数：90%\nD. 薰衣草 - 神秘浪漫，爱情指数：85%\n\n选择你的答案，看看你的爱情指数吧！💖",
];

pub const KFC_CLOSED_REPLY: &str = "今天不是星期四，等星期四再来吧！😄";
pub const KFC_STORY_CLOSED_REPLY: &str = "今天不是星期四，等星期四再来听故事吧！😄";

pub fn kfc() -> Result<KeywordHandler> {
    Ok(KeywordHandler::new("Kfc", &["kfc", "fun", "thursday"], KFC_KEYWORDS, KFC_REPLIES)
        .with_pattern(r"\d+[元块]")?
        .with_emojis(KFC_EMOJIS)
        .only_on(Weekday::Thu, KFC_CLOSED_REPLY))
}

pub fn kfc_story() -> KeywordHandler {
    KeywordHandler::new("KfcStory", &["kfc", "story", "fun"], KFC_STORY_KEYWORDS, KFC_STORIES)
        .with_emojis(KFC_STORY_EMOJIS)
        .only_on(Weekday::Thu, KFC_STORY_CLOSED_REPLY)
}

pub fn love() -> KeywordHandler {
    KeywordHandler::new("Love", &["love", "romance", "fun"], LOVE_KEYWORDS, LOVE_LINES)
}

pub fn love_story() -> KeywordHandler {
    KeywordHandler::new("LoveStory", &["love", "story", "romance"], LOVE_STORY_KEYWORDS, LOVE_STORIES)
}

pub fn love_advice() -> KeywordHandler {
    KeywordHandler::new("LoveAdvice", &["love", "advice", "help"], LOVE_ADVICE_KEYWORDS, LOVE_ADVICE)
}

pub fn love_test() -> KeywordHandler {
    KeywordHandler::new("LoveTest", &["love", "test", "fun"], LOVE_TEST_KEYWORDS, LOVE_TESTS)
}
