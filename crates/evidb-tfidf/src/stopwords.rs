use std::collections::HashSet;
use std::sync::OnceLock;

const ENGLISH: &[&str] = &[
	"a","about","above","after","again","against","all","almost","alone","along","already","also","although","always","am","among","an","and","another","any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
	"be","became","because","become","becomes","been","before","beforehand","being","below","beside","besides","between","beyond","both","but","by",
	"can","cannot","could","did","do","does","done","down","due","during","each","either","else","elsewhere","enough","etc","even","ever","every","everyone","everything","everywhere","except",
	"few","for","former","formerly","from","further","had","has","hasnt","have","having","he","hence","her","here","hereafter","hereby","herein","hers","herself","him","himself","his","how","however",
	"i","ie","if","in","indeed","into","is","it","its","itself","just","last","latter","least","less","ltd","made","many","may","me","meanwhile","might","more","moreover","most","mostly","much","must","my","myself",
	"namely","neither","never","nevertheless","next","no","nobody","none","noone","nor","not","nothing","now","nowhere","of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours","ourselves","out","over","own",
	"per","perhaps","please","put","rather","re","same","see","seem","seemed","seeming","seems","several","she","should","since","so","some","somehow","someone","something","sometime","sometimes","somewhere","still","such",
	"than","that","the","their","them","themselves","then","thence","there","thereafter","thereby","therefore","therein","these","they","this","those","though","through","throughout","thru","thus","to","together","too","toward","towards",
	"under","until","up","upon","us","very","via","was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas","whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever","whole","whom","whose","why","will","with","within","without","would",
	"yet","you","your","yours","yourself","yourselves",
];

/// English stop words removed before n-grams are formed.
pub fn english() -> &'static HashSet<&'static str> {
	static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
	SET.get_or_init(|| ENGLISH.iter().copied().collect())
}

pub fn is_stop_word(token: &str) -> bool { english().contains(token) }
